//! Member registration and stateless bearer-token authentication.
//!
//! Members sign up and log in with a membername and password; a successful
//! login returns an HS512-signed JWT. Later requests present it as
//! `Authorization: Bearer <token>` and protected routes check its authorities.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::http::AppState;
pub use services::MemberService;

use axum::routing::{get, post};
use handlers::http;

/// Build the API router. Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let api_routes = axum::Router::new()
        .route("/hello", get(http::hello))
        .route("/authenticate", post(auth::authenticate))
        .route("/signup", post(handlers::signup))
        .route("/member", get(handlers::get_my_member))
        .route("/member/:membername", get(handlers::get_member));

    axum::Router::new()
        .route("/health", get(http::health))
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::identity_interceptor,
        ))
        .with_state(state)
}
