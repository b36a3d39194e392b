//! coral-shop — online store backend
//!
//! HTTP/JSON API over PostgreSQL:
//! - Public catalog reads (products, categories)
//! - Cart submission and billing capture
//! - Password signup/signin issuing JWT bearer tokens
//! - JWT-protected admin catalog and order management

mod api;
mod auth;
mod config;
mod db;
mod error;
mod images;
mod state;
mod util;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coral_shop=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting coral-shop (env: {})", config.environment);

    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("coral-shop listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
