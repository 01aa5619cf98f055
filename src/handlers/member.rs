//! Member HTTP handlers: signup, own record, record by name.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;
use validator::Validate;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::rbac::{AdminOnly, Authorized, MemberOrAdmin};
use crate::models::MemberResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 50))]
    pub membername: String,
    #[validate(length(min = 3, max = 100))]
    pub password: String,
    #[validate(length(min = 1, max = 50))]
    pub nickname: String,
}

/// POST /api/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<MemberResponse>, AppError> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let member = state
        .member_service()
        .signup(&body.membername, &body.password, &body.nickname)
        .await?;
    Ok(Json(member.into()))
}

/// GET /api/member: MEMBER or ADMIN
pub async fn get_my_member(
    State(state): State<AppState>,
    auth: Authorized<MemberOrAdmin>,
) -> Result<Json<MemberResponse>, AppError> {
    let member = state
        .member_service()
        .get_my_member_with_authorities(auth.identity())
        .await?;
    Ok(Json(member.into()))
}

/// GET /api/member/:membername: ADMIN
pub async fn get_member(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
    Path(membername): Path<String>,
) -> Result<Json<MemberResponse>, AppError> {
    debug!(membername = %membername, "member lookup");
    let member = state
        .member_service()
        .get_member_with_authorities(&membername)
        .await?;
    Ok(Json(member.into()))
}
