//! Request/response types and HTTP API for the Keygate server.

mod error;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use keygate_license::{LicenseError, LicenseGate};
use serde::{Deserialize, Serialize};

pub use error::{
    ApiError, Endpoint, MSG_INTERNAL, MSG_INVALID_PRODUCT_KEY, MSG_PRODUCT_KEY_REQUIRED,
    MSG_TOKEN_INVALID, MSG_TOKEN_KEY_UNKNOWN, MSG_TOKEN_REQUIRED, MSG_USER_NOT_FOUND,
};

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueTokenRequest {
    #[serde(default)]
    pub product_key: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct TokenRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct IssueTokenResponse {
    pub token: String,
}

/// Body returned by validate-token and get-user.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TokenStatusResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TokenStatusResponse {
    pub fn valid() -> Self {
        Self {
            valid: true,
            user: None,
            error: None,
        }
    }

    pub fn with_user(user: String) -> Self {
        Self {
            valid: true,
            user: Some(user),
            error: None,
        }
    }

    pub fn rejected(error: String) -> Self {
        Self {
            valid: false,
            user: None,
            error: Some(error),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

async fn issue_token_handler(
    State(gate): State<LicenseGate>,
    body: Result<Json<IssueTokenRequest>, JsonRejection>,
) -> Result<Json<IssueTokenResponse>, ApiError> {
    let endpoint = Endpoint::IssueToken;
    let Json(req) = body.map_err(|e| ApiError::bad_request(endpoint, e.body_text()))?;
    let product_key = req.product_key.ok_or_else(|| {
        ApiError::from_license(
            endpoint,
            LicenseError::MalformedRequest(MSG_PRODUCT_KEY_REQUIRED.to_string()),
        )
    })?;

    let token = gate
        .issue_token(&product_key)
        .await
        .map_err(|e| ApiError::from_license(endpoint, e))?;
    Ok(Json(IssueTokenResponse { token }))
}

async fn validate_token_handler(
    State(gate): State<LicenseGate>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenStatusResponse>, ApiError> {
    let endpoint = Endpoint::ValidateToken;
    let Json(req) = body.map_err(|e| ApiError::bad_request(endpoint, e.body_text()))?;

    gate.validate_token(req.token.as_deref().unwrap_or_default())
        .await
        .map_err(|e| ApiError::from_license(endpoint, e))?;
    Ok(Json(TokenStatusResponse::valid()))
}

async fn get_user_handler(
    State(gate): State<LicenseGate>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenStatusResponse>, ApiError> {
    let endpoint = Endpoint::GetUser;
    let Json(req) = body.map_err(|e| ApiError::bad_request(endpoint, e.body_text()))?;

    let user = gate
        .get_user(req.token.as_deref().unwrap_or_default())
        .await
        .map_err(|e| ApiError::from_license(endpoint, e))?;
    Ok(Json(TokenStatusResponse::with_user(user)))
}

/// Build the HTTP API router around the given gate.
pub fn build_router(gate: LicenseGate) -> Router {
    Router::new()
        .route("/api/validate-key", post(issue_token_handler))
        .route("/api/validate-token", post(validate_token_handler))
        .route("/api/get-user", post(get_user_handler))
        .with_state(gate)
}
