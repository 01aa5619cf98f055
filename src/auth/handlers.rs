//! Auth HTTP handlers: authenticate.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::auth::BEARER_PREFIX;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 3, max = 50))]
    pub membername: String,
    #[validate(length(min = 3, max = 100))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/authenticate
pub async fn authenticate(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<TokenResponse>), AppError> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let identity = state
        .authenticator()
        .authenticate(&body.membername, &body.password)
        .await?;
    let token = state
        .token_codec()
        .issue(&identity)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("issue token: {}", e)))?;

    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(&format!("{}{}", BEARER_PREFIX, token))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("authorization header: {}", e)))?;
    headers.insert(AUTHORIZATION, value);

    Ok((headers, Json(TokenResponse { token })))
}
