//! Factories for database clients and the repository bundle.

use crate::client::DbClient;
use crate::error::DbError;
use crate::repositories::{
    SqlAccessRepository, SqlAppointmentRepository, SqlBarberRepository,
    SqlNotificationRepository, SqlReportRepository, SqlServiceRepository,
};
use crate::repository::RepositoryFactory;
use barbershop_config::{AppConfig, DatabaseConfig};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct DbClientFactory;

impl DbClientFactory {
    pub fn new() -> Self {
        Self
    }

    pub async fn from_app_config(&self, config: &Arc<AppConfig>) -> Result<DbClient, DbError> {
        debug!("Creating database client from application configuration");
        self.from_db_config(&config.database).await
    }

    pub async fn from_db_config(&self, db_config: &DatabaseConfig) -> Result<DbClient, DbError> {
        DbClient::from_config(db_config).await
    }

    pub async fn from_url(&self, db_url: &str) -> Result<DbClient, DbError> {
        DbClient::from_url(db_url).await
    }
}

/// Every repository, sharing one client. Handlers hold this through their state.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub client: DbClient,
    pub services: SqlServiceRepository,
    pub barbers: SqlBarberRepository,
    pub appointments: SqlAppointmentRepository,
    pub access: SqlAccessRepository,
    pub notifications: SqlNotificationRepository,
    pub reports: SqlReportRepository,
}

#[derive(Debug, Clone, Default)]
pub struct RepositoriesFactory;

impl RepositoryFactory<Repositories, DbClient> for RepositoriesFactory {
    fn create_repository(&self, db_client: DbClient) -> Repositories {
        Repositories {
            services: SqlServiceRepository::new(db_client.clone()),
            barbers: SqlBarberRepository::new(db_client.clone()),
            appointments: SqlAppointmentRepository::new(db_client.clone()),
            access: SqlAccessRepository::new(db_client.clone()),
            notifications: SqlNotificationRepository::new(db_client.clone()),
            reports: SqlReportRepository::new(db_client.clone()),
            client: db_client,
        }
    }
}

impl Repositories {
    pub fn new(db_client: DbClient) -> Self {
        RepositoriesFactory.create_repository(db_client)
    }
}
