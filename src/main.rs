//! Entry point: load config, derive the signing key, wire dependencies, and run the server.

use std::sync::Arc;

use memberauth::auth::{Argon2Encoder, SigningKey, TokenCodec};
use memberauth::config::Config;
use memberauth::db::{self, PgCredentialStore};
use memberauth::{create_app, AppState};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Bad key material must stop startup, not the first login.
    let signing_key =
        SigningKey::from_base64(&config.jwt_secret).map_err(|e| anyhow::anyhow!("JWT_SECRET: {}", e))?;
    let token_codec = TokenCodec::new(signing_key, config.token_validity);

    let db_pool = db::create_pool(&config.database_url, config.pool).await?;
    let store = Arc::new(PgCredentialStore::new(db_pool));
    let state = AppState::new(store, Arc::new(Argon2Encoder), token_codec);

    if let Some(admin) = &config.admin {
        state
            .member_service()
            .ensure_admin(&admin.membername, &admin.password)
            .await?;
    }

    let app = create_app(state).layer(TraceLayer::new_for_http());

    tracing::info!(
        addr = %config.server_addr,
        token_validity_seconds = config.token_validity.num_seconds(),
        "listening"
    );
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
