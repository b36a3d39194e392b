//! Application state

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::config::Config;
use crate::images::ImageStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Per-statement and pool-acquire bound for database round trips.
const DB_TIMEOUT: Duration = Duration::from_secs(3);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Issuer/audience domain for tokens
    pub token_domain: String,
    /// Filesystem blob store for product images
    pub images: ImageStore,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let options: PgConnectOptions = config.database_url.parse::<PgConnectOptions>()?.options([
            // A statement exceeding the bound fails with a timeout error
            // instead of hanging the handling task.
            ("statement_timeout", DB_TIMEOUT.as_millis().to_string()),
        ]);

        let pool = PgPoolOptions::new()
            .acquire_timeout(DB_TIMEOUT)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let images = ImageStore::new(&config.image_dir)?;

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            token_domain: config.token_domain.clone(),
            images,
        })
    }
}
