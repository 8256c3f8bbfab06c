//! Error types for product key and token handling.

use thiserror::Error;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// A required request field is missing or has the wrong type.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The canonical product key is not present in the key directory.
    #[error("product key rejected")]
    KeyRejected,

    /// Token signature, format or expiry check failed.
    ///
    /// The reason is kept for logs only; callers see a single
    /// "invalid or expired" outcome.
    #[error("token rejected: {0}")]
    TokenRejected(String),

    /// The signing secret is unusable.
    #[error("invalid signing secret: {0}")]
    InvalidSecret(String),

    /// Token could not be signed.
    #[error("token encoding failed: {0}")]
    Encoding(String),

    /// The key directory backend failed.
    #[error("key directory error: {0}")]
    Directory(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error while loading a key table.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl LicenseError {
    /// Returns true if this error is caused by the caller's input rather than
    /// by the service itself.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedRequest(_) | Self::KeyRejected | Self::TokenRejected(_)
        )
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
