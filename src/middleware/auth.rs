//! Identity interceptor: turns a valid bearer token into a [`RequestContext`].
//!
//! Never rejects a request. Missing, non-bearer or invalid tokens leave the
//! context anonymous and the role gate decides downstream.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::{RequestContext, TokenCodec};
use crate::handlers::http::AppState;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Token candidate from an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .filter(|t| !t.trim().is_empty())
}

pub fn resolve_context(codec: &TokenCodec, header: Option<&str>, uri: &str) -> RequestContext {
    let Some(token) = bearer_token(header) else {
        debug!(uri = %uri, "no bearer token");
        return RequestContext::anonymous();
    };
    if !codec.is_valid(token) {
        debug!(uri = %uri, "no valid bearer token");
        return RequestContext::anonymous();
    }
    match codec.decode(token) {
        Ok(identity) => {
            debug!(subject = %identity.subject, uri = %uri, "identity attached");
            RequestContext::authenticated(identity)
        }
        // expired between the two checks
        Err(e) => {
            debug!(uri = %uri, reason = %e, "no valid bearer token");
            RequestContext::anonymous()
        }
    }
}

/// Middleware: attach the request's [`RequestContext`] to its extensions.
pub async fn identity_interceptor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let ctx = resolve_context(state.token_codec(), header, request.uri().path());
    request.extensions_mut().insert(ctx);
    next.run(request).await
}
