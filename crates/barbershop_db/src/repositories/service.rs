//! Repository for the service catalogue

use crate::error::DbError;
use crate::repositories::non_empty;
use crate::repository::SchemaInit;
use sqlx::FromRow;

pub use barbershop_common::models::{Service, ServiceInput, ServicePatch};

/// Row shape of the `services` table. `active` is stored as 0/1.
#[derive(Debug, Clone, FromRow)]
pub struct DbService {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub duration_minutes: i64,
    pub active: i64,
    pub created_at: String,
}

impl From<DbService> for Service {
    fn from(db: DbService) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: non_empty(db.description),
            price_cents: db.price_cents,
            duration_minutes: db.duration_minutes,
            active: db.active != 0,
            created_at: db.created_at,
        }
    }
}

pub trait ServiceRepository: SchemaInit {
    /// List services ordered by name. With `active_only`, inactive services are hidden.
    fn list_services(
        &self,
        active_only: bool,
    ) -> impl std::future::Future<Output = Result<Vec<Service>, DbError>> + Send;

    fn find_service(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Service>, DbError>> + Send;

    fn create_service(
        &self,
        input: ServiceInput,
    ) -> impl std::future::Future<Output = Result<Service, DbError>> + Send;

    /// Apply a partial update. Returns `None` when the id is unknown.
    fn update_service(
        &self,
        id: &str,
        patch: ServicePatch,
    ) -> impl std::future::Future<Output = Result<Option<Service>, DbError>> + Send;

    /// Soft delete or restore. Returns `None` when the id is unknown.
    fn set_service_active(
        &self,
        id: &str,
        active: bool,
    ) -> impl std::future::Future<Output = Result<Option<Service>, DbError>> + Send;
}
