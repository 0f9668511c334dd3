//! Shared repository plumbing.

use crate::error::DbError;
use std::future::Future;

/// Creates repository instances from a configuration value (usually a `DbClient`).
pub trait RepositoryFactory<R, C> {
    fn create_repository(&self, config: C) -> R;
}

/// Implemented by every repository that owns tables.
pub trait SchemaInit {
    /// Create the repository's tables and indexes if they do not exist.
    fn init_schema(&self) -> impl Future<Output = Result<(), DbError>> + Send;
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub(crate) fn flag(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
