use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the directory store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid directory fixture: {0}")]
    InvalidFixture(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Lazily connected Postgres pool for the LMS database.
///
/// The pool is created on first use so the server can start (and report a
/// degraded `/health`) while the database is still coming up.
pub struct DatabaseManager {
    url: String,
    settings: DatabaseConfig,
    pool: OnceCell<PgPool>,
}

impl DatabaseManager {
    pub fn new(url: impl Into<String>, settings: DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = url.into();
        Self::validate_url(&url)?;
        Ok(Self {
            url,
            settings,
            pool: OnceCell::new(),
        })
    }

    /// Build from `DATABASE_URL`
    pub fn from_env(settings: DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = std::env::var("DATABASE_URL").map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
        Self::new(url, settings)
    }

    /// Get the pool, connecting on first call
    pub async fn pool(&self) -> Result<&PgPool, DatabaseError> {
        self.pool
            .get_or_try_init(|| async {
                let pool = PgPoolOptions::new()
                    .max_connections(self.settings.max_connections)
                    .acquire_timeout(Duration::from_secs(self.settings.connection_timeout))
                    .connect(&self.url)
                    .await?;
                info!("Created database pool for: {}", Self::redacted(&self.url));
                Ok::<_, DatabaseError>(pool)
            })
            .await
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        let pool = self.pool().await?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Close the pool if it was ever opened (e.g., on shutdown)
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            info!("Closed database pool: {}", Self::redacted(&self.url));
        }
    }

    /// Accept only postgres URLs that name a database.
    fn validate_url(raw: &str) -> Result<(), DatabaseError> {
        let url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }
        if url.path().trim_start_matches('/').is_empty() {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }
        Ok(())
    }

    /// URL with the password masked, for logs
    fn redacted(raw: &str) -> String {
        match url::Url::parse(raw) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("***"));
                }
                url.into()
            }
            Err(_) => "<invalid url>".to_string(),
        }
    }
}
