//! SQL implementation of the barber repository

use crate::error::DbError;
use crate::repositories::barber::{
    join_specialties, Barber, BarberInput, BarberPatch, BarberRepository, DbBarber,
    DbWorkingHours, WorkingHours,
};
use crate::repository::{flag, new_id, now_timestamp, SchemaInit};
use crate::DbClient;
use tracing::{debug, info};

const SELECT_BARBER: &str = r#"
    SELECT id, name, COALESCE(phone, '') AS phone, specialties, active, created_at
    FROM barbers
"#;

const SELECT_HOURS: &str = r#"
    SELECT barber_id, weekday, start_time, end_time,
           COALESCE(break_start, '') AS break_start, COALESCE(break_end, '') AS break_end
    FROM working_hours
"#;

#[derive(Debug, Clone)]
pub struct SqlBarberRepository {
    db_client: DbClient,
}

impl SqlBarberRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    async fn write_barber(&self, barber: &Barber) -> Result<(), DbError> {
        sqlx::query(
            r#"
            UPDATE barbers SET name = $1, phone = $2, specialties = $3, active = $4
            WHERE id = $5
            "#,
        )
        .bind(&barber.name)
        .bind(&barber.phone)
        .bind(join_specialties(&barber.specialties))
        .bind(flag(barber.active))
        .bind(&barber.id)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| DbError::query("Failed to update barber", e))?;
        Ok(())
    }
}

impl SchemaInit for SqlBarberRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing barbers schema");

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS barbers (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    phone TEXT,
                    specialties TEXT NOT NULL DEFAULT '',
                    active INTEGER NOT NULL DEFAULT 1,
                    created_at TEXT NOT NULL
                )
                "#,
            )
            .await?;

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS working_hours (
                    barber_id TEXT NOT NULL,
                    weekday INTEGER NOT NULL,
                    start_time TEXT NOT NULL,
                    end_time TEXT NOT NULL,
                    break_start TEXT,
                    break_end TEXT,
                    PRIMARY KEY (barber_id, weekday)
                )
                "#,
            )
            .await?;

        info!("Barbers schema initialized successfully");
        Ok(())
    }
}

impl BarberRepository for SqlBarberRepository {
    async fn list_barbers(&self, active_only: bool) -> Result<Vec<Barber>, DbError> {
        debug!("Listing barbers (active_only: {})", active_only);

        let query = if active_only {
            format!("{} WHERE active = 1 ORDER BY name", SELECT_BARBER)
        } else {
            format!("{} ORDER BY name", SELECT_BARBER)
        };

        let rows = sqlx::query_as::<_, DbBarber>(&query)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to list barbers", e))?;

        Ok(rows.into_iter().map(Barber::from).collect())
    }

    async fn find_barber(&self, id: &str) -> Result<Option<Barber>, DbError> {
        let query = format!("{} WHERE id = $1", SELECT_BARBER);
        let row = sqlx::query_as::<_, DbBarber>(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to find barber", e))?;

        Ok(row.map(Barber::from))
    }

    async fn create_barber(&self, input: BarberInput) -> Result<Barber, DbError> {
        let barber = Barber {
            id: new_id(),
            name: input.name,
            phone: input.phone,
            specialties: input.specialties,
            active: input.active,
            created_at: now_timestamp(),
        };

        sqlx::query(
            r#"
            INSERT INTO barbers (id, name, phone, specialties, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&barber.id)
        .bind(&barber.name)
        .bind(&barber.phone)
        .bind(join_specialties(&barber.specialties))
        .bind(flag(barber.active))
        .bind(&barber.created_at)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| DbError::query("Failed to insert barber", e))?;

        info!("Barber created: {} ({})", barber.name, barber.id);
        Ok(barber)
    }

    async fn update_barber(&self, id: &str, patch: BarberPatch) -> Result<Option<Barber>, DbError> {
        let Some(current) = self.find_barber(id).await? else {
            return Ok(None);
        };

        let updated = Barber {
            name: patch.name.unwrap_or(current.name),
            phone: patch.phone.or(current.phone),
            specialties: patch.specialties.unwrap_or(current.specialties),
            active: patch.active.unwrap_or(current.active),
            ..current
        };
        self.write_barber(&updated).await?;

        info!("Barber updated: {}", updated.id);
        Ok(Some(updated))
    }

    async fn toggle_barber_active(&self, id: &str) -> Result<Option<Barber>, DbError> {
        let result = sqlx::query(
            "UPDATE barbers SET active = CASE WHEN active = 0 THEN 1 ELSE 0 END WHERE id = $1",
        )
        .bind(id)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| DbError::query("Failed to toggle barber", e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        let barber = self.find_barber(id).await?;
        if let Some(b) = &barber {
            info!("Barber {} active = {}", b.id, b.active);
        }
        Ok(barber)
    }

    async fn working_hours(&self, barber_id: &str) -> Result<Vec<WorkingHours>, DbError> {
        let query = format!("{} WHERE barber_id = $1 ORDER BY weekday", SELECT_HOURS);
        let rows = sqlx::query_as::<_, DbWorkingHours>(&query)
            .bind(barber_id)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to load working hours", e))?;

        Ok(rows.into_iter().map(WorkingHours::from).collect())
    }

    async fn working_hours_for_weekday(
        &self,
        barber_id: &str,
        weekday: u8,
    ) -> Result<Option<WorkingHours>, DbError> {
        debug!("Loading hours for barber {} weekday {}", barber_id, weekday);

        let query = format!("{} WHERE barber_id = $1 AND weekday = $2", SELECT_HOURS);
        let row = sqlx::query_as::<_, DbWorkingHours>(&query)
            .bind(barber_id)
            .bind(weekday as i64)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to load working hours", e))?;

        Ok(row.map(WorkingHours::from))
    }

    async fn replace_working_hours(
        &self,
        barber_id: &str,
        hours: Vec<WorkingHours>,
    ) -> Result<Vec<WorkingHours>, DbError> {
        let mut tx = self.db_client.begin().await?;

        sqlx::query("DELETE FROM working_hours WHERE barber_id = $1")
            .bind(barber_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::query("Failed to clear working hours", e))?;

        for row in &hours {
            sqlx::query(
                r#"
                INSERT INTO working_hours (barber_id, weekday, start_time, end_time, break_start, break_end)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(barber_id)
            .bind(row.weekday as i64)
            .bind(&row.start_time)
            .bind(&row.end_time)
            .bind(&row.break_start)
            .bind(&row.break_end)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::query("Failed to insert working hours", e))?;
        }

        tx.commit().await.map_err(DbError::transaction)?;

        info!(
            "Working hours replaced for barber {} ({} days)",
            barber_id,
            hours.len()
        );
        self.working_hours(barber_id).await
    }
}
