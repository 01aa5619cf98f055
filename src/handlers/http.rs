//! Shared state plus the open endpoints (health, hello).

use std::sync::Arc;

use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::auth::{Authenticator, PasswordEncoder, TokenCodec};
use crate::db::CredentialStore;
use crate::services::MemberService;

/// Shared application state. Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    token_codec: Arc<TokenCodec>,
    authenticator: Authenticator,
    member_service: MemberService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        encoder: Arc<dyn PasswordEncoder>,
        token_codec: TokenCodec,
    ) -> Self {
        Self {
            token_codec: Arc::new(token_codec),
            authenticator: Authenticator::new(store.clone(), encoder.clone()),
            member_service: MemberService::new(store, encoder),
        }
    }

    pub fn token_codec(&self) -> &TokenCodec {
        &self.token_codec
    }
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }
    pub fn member_service(&self) -> &MemberService {
        &self.member_service
    }
}

/// GET /health: liveness check.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "memberauth" })),
    )
}

/// GET /api/hello: open to anyone.
pub async fn hello() -> &'static str {
    "hello"
}
