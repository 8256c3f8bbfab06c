//! Mapping of license failures onto HTTP responses.
//!
//! The same condition reads differently per endpoint (a token whose key has
//! disappeared is "does not match a valid product key" on validate-token but
//! "user not found" on get-user), so every error carries its endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use keygate_license::LicenseError;
use tracing::error;

use crate::{ErrorResponse, TokenStatusResponse};

pub const MSG_INVALID_PRODUCT_KEY: &str = "Invalid product key";
pub const MSG_PRODUCT_KEY_REQUIRED: &str = "Product key is required";
pub const MSG_TOKEN_REQUIRED: &str = "Token is required";
pub const MSG_TOKEN_INVALID: &str = "Token is invalid or has expired";
pub const MSG_TOKEN_KEY_UNKNOWN: &str = "Token does not match a valid product key";
pub const MSG_USER_NOT_FOUND: &str = "User not found for the provided token";
pub const MSG_INTERNAL: &str = "Internal server error";

/// The operation a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    IssueToken,
    ValidateToken,
    GetUser,
}

/// A failed request, ready to be rendered.
#[derive(Debug)]
pub struct ApiError {
    endpoint: Endpoint,
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// The request body could not be decoded.
    pub fn bad_request(endpoint: Endpoint, message: impl Into<String>) -> Self {
        Self {
            endpoint,
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Maps a license failure to the wording of `endpoint`.
    pub fn from_license(endpoint: Endpoint, err: LicenseError) -> Self {
        let (status, message) = match (&err, endpoint) {
            (LicenseError::MalformedRequest(msg), Endpoint::IssueToken) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            (LicenseError::MalformedRequest(_), _) => {
                (StatusCode::UNAUTHORIZED, MSG_TOKEN_REQUIRED.to_string())
            }
            (LicenseError::KeyRejected, Endpoint::IssueToken) => {
                (StatusCode::UNAUTHORIZED, MSG_INVALID_PRODUCT_KEY.to_string())
            }
            (LicenseError::KeyRejected, Endpoint::ValidateToken) => {
                (StatusCode::UNAUTHORIZED, MSG_TOKEN_KEY_UNKNOWN.to_string())
            }
            (LicenseError::KeyRejected, Endpoint::GetUser) => {
                (StatusCode::UNAUTHORIZED, MSG_USER_NOT_FOUND.to_string())
            }
            (LicenseError::TokenRejected(_), _) => {
                (StatusCode::UNAUTHORIZED, MSG_TOKEN_INVALID.to_string())
            }
            _ => {
                error!("{:?} request failed: {}", endpoint, err);
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL.to_string())
            }
        };

        Self {
            endpoint,
            status,
            message,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.endpoint {
            Endpoint::IssueToken => (
                self.status,
                Json(ErrorResponse {
                    error: self.message,
                }),
            )
                .into_response(),
            Endpoint::ValidateToken | Endpoint::GetUser => (
                self.status,
                Json(TokenStatusResponse::rejected(self.message)),
            )
                .into_response(),
        }
    }
}
