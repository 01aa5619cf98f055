//! Role gate. Each protected handler names its requirement in its signature:
//!
//! ```ignore
//! async fn admin_only(Authorized(identity, ..): Authorized<AdminOnly>) -> AppResult<Json<()>> {
//!     Ok(Json(()))
//! }
//! ```

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use tracing::debug;

use crate::auth::{Identity, RequestContext, ROLE_ADMIN, ROLE_MEMBER};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
}

impl AccessError {
    pub fn status(&self) -> StatusCode {
        match self {
            AccessError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AccessError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

/// Acceptable authorities for an operation; any one of them grants access.
pub trait RoleRequirement: Send + Sync + 'static {
    const ANY_OF: &'static [&'static str];
}

pub struct MemberOrAdmin;

impl RoleRequirement for MemberOrAdmin {
    const ANY_OF: &'static [&'static str] = &[ROLE_MEMBER, ROLE_ADMIN];
}

pub struct AdminOnly;

impl RoleRequirement for AdminOnly {
    const ANY_OF: &'static [&'static str] = &[ROLE_ADMIN];
}

pub fn check_any_role<'a>(
    ctx: &'a RequestContext,
    any_of: &[&str],
) -> Result<&'a Identity, AccessError> {
    let identity = ctx.identity().ok_or(AccessError::Unauthenticated)?;
    if identity.has_any_role(any_of) {
        Ok(identity)
    } else {
        debug!(subject = %identity.subject, required = ?any_of, "insufficient authority");
        Err(AccessError::Forbidden)
    }
}

/// Extractor: identity that passed the `R` role check.
pub struct Authorized<R: RoleRequirement>(pub Identity, PhantomData<R>);

impl<R: RoleRequirement> Authorized<R> {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

#[axum::async_trait]
impl<S, R> FromRequestParts<S> for Authorized<R>
where
    S: Send + Sync,
    R: RoleRequirement,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = match RequestContext::from_request_parts(parts, state).await {
            Ok(ctx) => ctx,
            Err(never) => match never {},
        };
        let identity = check_any_role(&ctx, R::ANY_OF)?.clone();
        Ok(Authorized(identity, PhantomData))
    }
}
