//! SQL implementation of the service repository

use crate::error::DbError;
use crate::repositories::service::{
    DbService, Service, ServiceInput, ServicePatch, ServiceRepository,
};
use crate::repository::{flag, new_id, now_timestamp, SchemaInit};
use crate::DbClient;
use tracing::{debug, info};

const SELECT_SERVICE: &str = r#"
    SELECT id, name, COALESCE(description, '') AS description, price_cents, duration_minutes,
           active, created_at
    FROM services
"#;

#[derive(Debug, Clone)]
pub struct SqlServiceRepository {
    db_client: DbClient,
}

impl SqlServiceRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl SchemaInit for SqlServiceRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing services schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS services (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                price_cents INTEGER NOT NULL,
                duration_minutes INTEGER NOT NULL,
                active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            )
        "#;
        self.db_client.execute(query).await?;

        info!("Services schema initialized successfully");
        Ok(())
    }
}

impl ServiceRepository for SqlServiceRepository {
    async fn list_services(&self, active_only: bool) -> Result<Vec<Service>, DbError> {
        debug!("Listing services (active_only: {})", active_only);

        let query = if active_only {
            format!("{} WHERE active = 1 ORDER BY name", SELECT_SERVICE)
        } else {
            format!("{} ORDER BY name", SELECT_SERVICE)
        };

        let rows = sqlx::query_as::<_, DbService>(&query)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to list services", e))?;

        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn find_service(&self, id: &str) -> Result<Option<Service>, DbError> {
        debug!("Finding service: {}", id);

        let query = format!("{} WHERE id = $1", SELECT_SERVICE);
        let row = sqlx::query_as::<_, DbService>(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to find service", e))?;

        Ok(row.map(Service::from))
    }

    async fn create_service(&self, input: ServiceInput) -> Result<Service, DbError> {
        let service = Service {
            id: new_id(),
            name: input.name,
            description: input.description,
            price_cents: input.price_cents,
            duration_minutes: input.duration_minutes,
            active: input.active,
            created_at: now_timestamp(),
        };

        sqlx::query(
            r#"
            INSERT INTO services (id, name, description, price_cents, duration_minutes, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price_cents)
        .bind(service.duration_minutes)
        .bind(flag(service.active))
        .bind(&service.created_at)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| DbError::query("Failed to insert service", e))?;

        info!("Service created: {} ({})", service.name, service.id);
        Ok(service)
    }

    async fn update_service(
        &self,
        id: &str,
        patch: ServicePatch,
    ) -> Result<Option<Service>, DbError> {
        let Some(current) = self.find_service(id).await? else {
            return Ok(None);
        };

        let updated = Service {
            name: patch.name.unwrap_or(current.name),
            description: patch.description.or(current.description),
            price_cents: patch.price_cents.unwrap_or(current.price_cents),
            duration_minutes: patch.duration_minutes.unwrap_or(current.duration_minutes),
            active: patch.active.unwrap_or(current.active),
            ..current
        };

        sqlx::query(
            r#"
            UPDATE services
            SET name = $1, description = $2, price_cents = $3, duration_minutes = $4, active = $5
            WHERE id = $6
            "#,
        )
        .bind(&updated.name)
        .bind(&updated.description)
        .bind(updated.price_cents)
        .bind(updated.duration_minutes)
        .bind(flag(updated.active))
        .bind(&updated.id)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| DbError::query("Failed to update service", e))?;

        info!("Service updated: {}", updated.id);
        Ok(Some(updated))
    }

    async fn set_service_active(&self, id: &str, active: bool) -> Result<Option<Service>, DbError> {
        let result = sqlx::query("UPDATE services SET active = $1 WHERE id = $2")
            .bind(flag(active))
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to change service state", e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        info!("Service {} active = {}", id, active);
        self.find_service(id).await
    }
}
