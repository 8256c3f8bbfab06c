//! Product key exchange and bearer tokens for Keygate.
//!
//! This crate handles:
//! - Normalizing submitted product keys into their canonical form
//! - Looking canonical keys up in an injected [`KeyDirectory`]
//! - Issuing and verifying signed, time-boxed tokens
//! - The three request operations built on top: issue, validate, get-user
//!
//! # Token Format
//!
//! Tokens are HS256 JWTs carrying `productKey`, `user`, `iat` and `exp`.
//! They stay valid for [`TOKEN_TTL_SECS`] after issuance and only while the
//! embedded key still resolves in the directory.

mod directory;
mod error;
mod gate;
mod key;
mod token;

pub use directory::{KeyDirectory, ProductKeyRecord, StaticKeyDirectory};
pub use error::{LicenseError, LicenseResult};
pub use gate::LicenseGate;
pub use key::normalize;
pub use token::{TokenClaims, TokenService, TOKEN_TTL_SECS};
