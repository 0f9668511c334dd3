//! SQL implementation of the appointment repository

use crate::error::DbError;
use crate::repositories::appointment::{
    Appointment, AppointmentFilter, AppointmentRepository, AppointmentStatus, BookedTime,
    DbAppointment, DbStatusChange, StatusChange, StatusUpdate,
};
use crate::repository::{new_id, now_timestamp, SchemaInit};
use crate::DbClient;
use tracing::{debug, info, warn};

const SELECT_APPOINTMENT: &str = r#"
    SELECT id, client_name, client_phone, COALESCE(client_email, '') AS client_email,
           service_id, service_name, barber_id, appointment_date, appointment_time,
           duration_minutes, price_cents, status, COALESCE(notes, '') AS notes,
           created_at, updated_at
    FROM appointments
"#;

#[derive(Debug, Clone)]
pub struct SqlAppointmentRepository {
    db_client: DbClient,
}

impl SqlAppointmentRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn decode_all(rows: Vec<DbAppointment>) -> Result<Vec<Appointment>, DbError> {
    rows.into_iter().map(Appointment::try_from).collect()
}

impl SchemaInit for SqlAppointmentRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing appointments schema");

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS appointments (
                    id TEXT PRIMARY KEY,
                    client_name TEXT NOT NULL,
                    client_phone TEXT NOT NULL,
                    client_email TEXT,
                    service_id TEXT NOT NULL,
                    service_name TEXT NOT NULL,
                    barber_id TEXT NOT NULL,
                    appointment_date TEXT NOT NULL,
                    appointment_time TEXT NOT NULL,
                    duration_minutes INTEGER NOT NULL,
                    price_cents INTEGER NOT NULL,
                    status TEXT NOT NULL DEFAULT 'pending',
                    notes TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
            )
            .await?;

        // One live booking per barber slot; cancelled rows free the slot again.
        self.db_client
            .execute(
                r#"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_active_slot
                ON appointments (barber_id, appointment_date, appointment_time)
                WHERE status <> 'cancelled'
                "#,
            )
            .await?;

        self.db_client
            .execute(
                "CREATE INDEX IF NOT EXISTS idx_appointments_date ON appointments (appointment_date)",
            )
            .await?;

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS appointment_status_history (
                    id TEXT PRIMARY KEY,
                    appointment_id TEXT NOT NULL,
                    from_status TEXT NOT NULL,
                    to_status TEXT NOT NULL,
                    changed_by TEXT NOT NULL,
                    note TEXT,
                    changed_at TEXT NOT NULL
                )
                "#,
            )
            .await?;

        info!("Appointments schema initialized successfully");
        Ok(())
    }
}

impl AppointmentRepository for SqlAppointmentRepository {
    async fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment, DbError> {
        debug!(
            "Inserting appointment for barber {} at {} {}",
            appointment.barber_id, appointment.appointment_date, appointment.appointment_time
        );

        let mut tx = self.db_client.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO appointments (
                id, client_name, client_phone, client_email, service_id, service_name, barber_id,
                appointment_date, appointment_time, duration_minutes, price_cents, status, notes,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(&appointment.id)
        .bind(&appointment.client_name)
        .bind(&appointment.client_phone)
        .bind(&appointment.client_email)
        .bind(&appointment.service_id)
        .bind(&appointment.service_name)
        .bind(&appointment.barber_id)
        .bind(&appointment.appointment_date)
        .bind(&appointment.appointment_time)
        .bind(appointment.duration_minutes)
        .bind(appointment.price_cents)
        .bind(appointment.status.as_str())
        .bind(&appointment.notes)
        .bind(&appointment.created_at)
        .bind(&appointment.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::query("Failed to insert appointment", e))?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!("Appointment created: {}", appointment.id);
        Ok(appointment)
    }

    async fn find_appointment(&self, id: &str) -> Result<Option<Appointment>, DbError> {
        let query = format!("{} WHERE id = $1", SELECT_APPOINTMENT);
        let row = sqlx::query_as::<_, DbAppointment>(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to find appointment", e))?;

        row.map(Appointment::try_from).transpose()
    }

    async fn list_appointments(
        &self,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>, DbError> {
        debug!("Listing appointments with filter: {:?}", filter);

        let mut conditions = Vec::new();
        let mut binds: Vec<String> = Vec::new();
        if let Some(date) = filter.date {
            binds.push(date);
            conditions.push(format!("appointment_date = ${}", binds.len()));
        }
        if let Some(status) = filter.status {
            binds.push(status.as_str().to_string());
            conditions.push(format!("status = ${}", binds.len()));
        }
        if let Some(barber_id) = filter.barber_id {
            binds.push(barber_id);
            conditions.push(format!("barber_id = ${}", binds.len()));
        }

        let mut query = SELECT_APPOINTMENT.to_string();
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY appointment_date, appointment_time");

        let mut q = sqlx::query_as::<_, DbAppointment>(&query);
        for value in binds {
            q = q.bind(value);
        }
        let rows = q
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to list appointments", e))?;

        decode_all(rows)
    }

    async fn booked_times(&self, barber_id: &str, date: &str) -> Result<Vec<BookedTime>, DbError> {
        sqlx::query_as::<_, BookedTime>(
            r#"
            SELECT appointment_time, duration_minutes
            FROM appointments
            WHERE barber_id = $1 AND appointment_date = $2 AND status <> 'cancelled'
            ORDER BY appointment_time
            "#,
        )
        .bind(barber_id)
        .bind(date)
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| DbError::query("Failed to load booked times", e))
    }

    async fn update_status(
        &self,
        id: &str,
        expected: AppointmentStatus,
        to: AppointmentStatus,
        changed_by: &str,
        note: Option<String>,
    ) -> Result<StatusUpdate, DbError> {
        let now = now_timestamp();
        let mut tx = self.db_client.begin().await?;

        let result = sqlx::query(
            "UPDATE appointments SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4",
        )
        .bind(to.as_str())
        .bind(&now)
        .bind(id)
        .bind(expected.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::query("Failed to update appointment status", e))?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(DbError::transaction)?;
            return match self.find_appointment(id).await? {
                None => Ok(StatusUpdate::NotFound),
                Some(current) => {
                    warn!(
                        "Stale status update on {}: expected {}, found {}",
                        id, expected, current.status
                    );
                    Ok(StatusUpdate::Stale(current))
                }
            };
        }

        sqlx::query(
            r#"
            INSERT INTO appointment_status_history
                (id, appointment_id, from_status, to_status, changed_by, note, changed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(new_id())
        .bind(id)
        .bind(expected.as_str())
        .bind(to.as_str())
        .bind(changed_by)
        .bind(&note)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::query("Failed to record status history", e))?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!("Appointment {} moved {} -> {} by {}", id, expected, to, changed_by);
        match self.find_appointment(id).await? {
            Some(updated) => Ok(StatusUpdate::Applied(updated)),
            None => Ok(StatusUpdate::NotFound),
        }
    }

    async fn status_history(&self, appointment_id: &str) -> Result<Vec<StatusChange>, DbError> {
        let rows = sqlx::query_as::<_, DbStatusChange>(
            r#"
            SELECT id, appointment_id, from_status, to_status, changed_by,
                   COALESCE(note, '') AS note, changed_at
            FROM appointment_status_history
            WHERE appointment_id = $1
            ORDER BY changed_at, id
            "#,
        )
        .bind(appointment_id)
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| DbError::query("Failed to load status history", e))?;

        rows.into_iter().map(StatusChange::try_from).collect()
    }

    async fn delete_appointment(&self, id: &str) -> Result<Option<Appointment>, DbError> {
        let Some(existing) = self.find_appointment(id).await? else {
            return Ok(None);
        };

        let mut tx = self.db_client.begin().await?;
        sqlx::query("DELETE FROM appointment_status_history WHERE appointment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::query("Failed to delete status history", e))?;
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::query("Failed to delete appointment", e))?;
        tx.commit().await.map_err(DbError::transaction)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        info!("Appointment deleted: {}", id);
        Ok(Some(existing))
    }
}
