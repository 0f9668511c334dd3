//! Database client for the barbershop backend
//!
//! A thin wrapper over a `sqlx::Any` pool, so the same code runs against SQLite
//! (the default), PostgreSQL or MySQL depending on the URL and enabled features.

use crate::error::DbError;
use barbershop_config::{AppConfig, DatabaseConfig};
use sqlx::pool::PoolOptions;
use sqlx::{Pool, Transaction};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Type alias for a database transaction
pub type DbTransaction<'a> = Transaction<'a, sqlx::Any>;

#[derive(Debug, Clone)]
pub struct DbClient {
    pool: Pool<sqlx::Any>,
}

impl DbClient {
    /// Create a new database client from the application configuration.
    pub async fn new(config: &Arc<AppConfig>) -> Result<Self, DbError> {
        Self::from_config(&config.database).await
    }

    /// Create a new database client from a database configuration
    ///
    /// # Errors
    ///
    /// * The database URL is empty
    /// * The database connection fails
    pub async fn from_config(db_config: &DatabaseConfig) -> Result<Self, DbError> {
        if db_config.url.is_empty() {
            return Err(DbError::ConfigError("Database URL is empty".to_string()));
        }
        let pool = Self::create_pool(&db_config.url, db_config.max_connections).await?;
        Ok(Self { pool })
    }

    /// Create a new database client from a database URL with the default pool size.
    pub async fn from_url(db_url: &str) -> Result<Self, DbError> {
        if db_url.is_empty() {
            return Err(DbError::UrlError("Database URL is empty".to_string()));
        }
        let pool = Self::create_pool(db_url, DatabaseConfig::default().max_connections).await?;
        Ok(Self { pool })
    }

    async fn create_pool(db_url: &str, max_connections: u32) -> Result<Pool<sqlx::Any>, DbError> {
        debug!("Creating database pool with URL: {}", db_url);

        // Registers every driver compiled into sqlx with the Any driver
        sqlx::any::install_default_drivers();

        let in_memory = is_in_memory(db_url);

        // Each in-memory SQLite connection is its own database, so the pool must
        // hold exactly one connection and never recycle it.
        let pool_options = if in_memory {
            PoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            PoolOptions::new()
                .max_connections(max_connections.max(1))
                .acquire_timeout(Duration::from_secs(3))
                .idle_timeout(Duration::from_secs(600))
        };

        if db_url.starts_with("sqlite:") && !in_memory {
            ensure_sqlite_file(db_url)?;
        }

        let connect_options = sqlx::any::AnyConnectOptions::from_str(db_url)
            .map_err(|e| DbError::UrlError(e.to_string()))?;

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                error!("Failed to create database pool: {}", e);
                DbError::PoolError(e.to_string())
            })?;

        info!("Database pool created successfully");
        Ok(pool)
    }

    pub fn pool(&self) -> &Pool<sqlx::Any> {
        &self.pool
    }

    /// Begin a transaction
    pub async fn begin(&self) -> Result<DbTransaction<'_>, DbError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))
    }

    /// Execute a statement that returns no rows and report the rows affected.
    pub async fn execute(&self, query: &str) -> Result<u64, DbError> {
        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| DbError::QueryError(e.to_string()))
    }

    /// Check if the database answers a trivial query.
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

impl std::fmt::Display for DbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DbClient")
    }
}

fn is_in_memory(db_url: &str) -> bool {
    db_url.starts_with("sqlite:") && db_url.contains(":memory:")
}

/// Extract the file path from "sqlite:path", "sqlite://path" or "sqlite:///abs/path".
fn sqlite_path(db_url: &str) -> &str {
    let rest = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    rest.split('?').next().unwrap_or(rest)
}

/// SQLite refuses to open a missing file through the Any driver, so create it and
/// its parent directory up front.
fn ensure_sqlite_file(db_url: &str) -> Result<(), DbError> {
    let db_path = sqlite_path(db_url);
    if db_path.is_empty() {
        return Ok(());
    }
    let path = Path::new(db_path);

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            debug!("Creating directory for SQLite database: {:?}", dir);
            std::fs::create_dir_all(dir).map_err(|e| {
                error!("Failed to create directory for SQLite database: {}", e);
                DbError::PoolError(format!("Failed to create directory: {}", e))
            })?;
        }
    }

    if !path.exists() {
        debug!("Creating empty SQLite database file: {}", db_path);
        std::fs::File::create(path).map_err(|e| {
            error!("Failed to create SQLite database file: {}", e);
            DbError::PoolError(format!("Failed to create database file: {}", e))
        })?;
    }
    Ok(())
}
