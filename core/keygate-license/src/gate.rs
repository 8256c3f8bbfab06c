//! The three request operations: issue, validate and get-user.
//!
//! Every call is independent. The gate holds only the injected directory and
//! the token service, neither of which is mutated by a request.

use crate::directory::{KeyDirectory, ProductKeyRecord};
use crate::error::{LicenseError, LicenseResult};
use crate::key::normalize;
use crate::token::{TokenClaims, TokenService};
use std::sync::Arc;
use tracing::debug;

/// Exchanges product keys for tokens and checks tokens presented later.
#[derive(Clone)]
pub struct LicenseGate {
    directory: Arc<dyn KeyDirectory>,
    tokens: Arc<TokenService>,
}

impl std::fmt::Debug for LicenseGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseGate")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl LicenseGate {
    /// Creates a gate over the given directory and token service.
    pub fn new(directory: Arc<dyn KeyDirectory>, tokens: TokenService) -> Self {
        Self {
            directory,
            tokens: Arc::new(tokens),
        }
    }

    /// Returns the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Exchanges a product key for a signed token.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::KeyRejected`] if the normalized key is not in
    /// the directory.
    pub async fn issue_token(&self, product_key: &str) -> LicenseResult<String> {
        let canonical = normalize(product_key);
        let Some(record) = self.directory.lookup(&canonical).await? else {
            debug!("Rejected unknown product key");
            return Err(LicenseError::KeyRejected);
        };

        let token = self.tokens.issue(&record.canonical_key, &record.owner_user)?;
        debug!("Issued token for {}", record.owner_user);
        Ok(token)
    }

    /// Checks that a token verifies and still maps to a known product key.
    ///
    /// # Errors
    ///
    /// See [`LicenseGate::resolve`].
    pub async fn validate_token(&self, token: &str) -> LicenseResult<()> {
        self.resolve(token).await.map(|_| ())
    }

    /// Returns the user bound to a token.
    ///
    /// # Errors
    ///
    /// See [`LicenseGate::resolve`].
    pub async fn get_user(&self, token: &str) -> LicenseResult<String> {
        self.resolve(token).await.map(|(_, record)| record.owner_user)
    }

    /// Verifies a token and re-checks its key against the directory.
    ///
    /// The directory is consulted only after the token has verified.
    ///
    /// # Errors
    ///
    /// - [`LicenseError::MalformedRequest`] if the token is empty.
    /// - [`LicenseError::TokenRejected`] if the token is malformed, forged or expired.
    /// - [`LicenseError::KeyRejected`] if its key is no longer in the directory.
    pub async fn resolve(&self, token: &str) -> LicenseResult<(TokenClaims, ProductKeyRecord)> {
        if token.is_empty() {
            return Err(LicenseError::MalformedRequest("token is required".to_string()));
        }

        let claims = self.tokens.verify(token)?;
        match self.directory.lookup(&claims.canonical_key).await? {
            Some(record) => Ok((claims, record)),
            None => {
                debug!("Token verified but its product key is no longer known");
                Err(LicenseError::KeyRejected)
            }
        }
    }
}
