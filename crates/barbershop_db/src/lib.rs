//! Database integration for the barbershop backend
//!
//! The client is database agnostic: it uses SQLx's `Any` driver, so the URL picks
//! SQLite (default feature), PostgreSQL or MySQL.
//!
//! # Example
//!
//! ```rust,no_run
//! use barbershop_db::{init_all_schemas, DbClient, Repositories};
//!
//! async fn setup_db() -> Result<Repositories, barbershop_db::DbError> {
//!     let client = DbClient::from_url("sqlite::memory:").await?;
//!     let repos = Repositories::new(client);
//!     init_all_schemas(&repos).await?;
//!     Ok(repos)
//! }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod repositories;
pub mod repository;

#[cfg(test)]
mod repositories_test;

pub use client::{DbClient, DbTransaction};
pub use error::DbError;
pub use factory::{DbClientFactory, Repositories, RepositoriesFactory};
pub use repository::{RepositoryFactory, SchemaInit};

pub use repositories::{
    AccessRepository, AccessRequestOutcome, AppointmentRepository, BarberRepository, BookedTime,
    Decision, NotificationApproval, NotificationRepository, ReportRepository, ServiceRepository,
    SqlAccessRepository, SqlAppointmentRepository, SqlBarberRepository,
    SqlNotificationRepository, SqlReportRepository, SqlServiceRepository, StatusUpdate,
};

use tracing::info;

/// Create every table and index. Safe to run on each startup.
pub async fn init_all_schemas(repos: &Repositories) -> Result<(), DbError> {
    repos.services.init_schema().await?;
    repos.barbers.init_schema().await?;
    repos.appointments.init_schema().await?;
    repos.access.init_schema().await?;
    repos.notifications.init_schema().await?;
    info!("All database schemas initialized");
    Ok(())
}
