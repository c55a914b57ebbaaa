//! Server binary.
//!
//! Reads config from env vars:
//!   DATABASE_URL - SQLite database (default: sqlite:maternal_care.db)
//!   JWT_SECRET   - JWT HMAC secret (required)
//!   BIND_ADDR    - listen address (default: 0.0.0.0:3000)

use anyhow::Context;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use maternal_care_backend::auth::jwt::JwtConfig;
use maternal_care_backend::db::DbConnection;
use maternal_care_backend::rest::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:maternal_care.db".into());
    let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    info!("Setting up database");
    let db = DbConnection::new(&database_url).await?;

    let state = AppState::new(db, JwtConfig::from_secret(jwt_secret.as_bytes()));

    // The mobile client connects from whatever LAN address Expo hands it,
    // so the CORS policy stays open.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = build_router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;
    info!("Listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
