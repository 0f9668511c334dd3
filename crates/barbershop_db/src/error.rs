//! Error types for the database client

use barbershop_common::BarbershopError;
use thiserror::Error;
use tracing::error;

/// Errors that can occur when working with the database client
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// Error with database transaction
    #[error("Database transaction error: {0}")]
    TransactionError(String),

    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A stored value could not be mapped onto a domain type
    #[error("Invalid stored value: {0}")]
    DecodeError(String),
}

impl DbError {
    /// Map a sqlx error from a query, keeping unique violations distinguishable.
    pub(crate) fn query(context: &str, e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return DbError::UniqueViolation(format!("{}: {}", context, db_err.message()));
            }
        }
        error!("{}: {}", context, e);
        DbError::QueryError(format!("{}: {}", context, e))
    }

    pub(crate) fn transaction(e: sqlx::Error) -> Self {
        error!("Transaction failed: {}", e);
        DbError::TransactionError(e.to_string())
    }
}

impl From<DbError> for BarbershopError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation(msg) => BarbershopError::ConflictError(msg),
            DbError::ConfigError(msg) | DbError::UrlError(msg) => BarbershopError::ConfigError(msg),
            other => BarbershopError::DatabaseError(other.to_string()),
        }
    }
}
