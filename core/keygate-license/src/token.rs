//! Token issuance and verification.
//!
//! Tokens are HS256 JWTs. The payload keeps the field names clients already
//! decode: `productKey` and `user`, plus the standard `iat` and `exp`.

use crate::error::{LicenseError, LicenseResult};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Token validity window in seconds (30 days).
pub const TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// The payload carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Canonical product key the token was issued for.
    #[serde(rename = "productKey")]
    pub canonical_key: String,
    /// Owner of the product key at issuance.
    #[serde(rename = "user")]
    pub owner_user: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Signs and verifies tokens with a shared secret.
///
/// Stateless apart from the key material, so one instance can be shared
/// across concurrent requests.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service signing with `secret`.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidSecret`] if the secret is empty.
    pub fn new(secret: impl AsRef<[u8]>) -> LicenseResult<Self> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(LicenseError::InvalidSecret(
                "signing secret must not be empty".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs: TOKEN_TTL_SECS,
        })
    }

    /// Overrides the validity window.
    #[must_use]
    pub fn with_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Returns the validity window in seconds.
    #[must_use]
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issues a token for `canonical_key` owned by `owner_user`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Encoding`] if signing fails.
    pub fn issue(&self, canonical_key: &str, owner_user: &str) -> LicenseResult<String> {
        self.issue_at(canonical_key, owner_user, chrono::Utc::now().timestamp())
    }

    /// Issues a token as if it had been minted at `issued_at`
    /// (seconds since epoch).
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Encoding`] if signing fails.
    pub fn issue_at(
        &self,
        canonical_key: &str,
        owner_user: &str,
        issued_at: i64,
    ) -> LicenseResult<String> {
        let claims = TokenClaims {
            canonical_key: canonical_key.to_string(),
            owner_user: owner_user.to_string(),
            iat: issued_at,
            exp: issued_at + self.ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| LicenseError::Encoding(e.to_string()))
    }

    /// Verifies signature and expiry and returns the embedded claims.
    ///
    /// Malformed input, a bad signature and an elapsed window all yield
    /// [`LicenseError::TokenRejected`]; the reason string is for logs only.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::TokenRejected`] if the token does not verify.
    pub fn verify(&self, token: &str) -> LicenseResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token verification failed: {:?}", e.kind());
                LicenseError::TokenRejected(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secret_rejected() {
        assert!(matches!(
            TokenService::new(""),
            Err(LicenseError::InvalidSecret(_))
        ));
    }

    #[test]
    fn exp_is_iat_plus_ttl() {
        let svc = TokenService::new("unit-test-secret").unwrap();
        let now = chrono::Utc::now().timestamp();
        let token = svc.issue_at("111122223333", "User2", now).unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.iat, now);
        assert_eq!(claims.exp, now + TOKEN_TTL_SECS);
    }

    #[test]
    fn debug_hides_key_material() {
        let svc = TokenService::new("super-secret-value").unwrap();
        let dbg = format!("{svc:?}");
        assert!(!dbg.contains("super-secret-value"));
        assert!(dbg.contains("ttl_secs"));
    }
}
