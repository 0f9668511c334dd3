//! Repository for appointments and their status audit trail

use crate::error::DbError;
use crate::repositories::non_empty;
use crate::repository::SchemaInit;
use sqlx::FromRow;

pub use barbershop_common::models::{
    Appointment, AppointmentFilter, AppointmentStatus, StatusChange,
};

#[derive(Debug, Clone, FromRow)]
pub struct DbAppointment {
    pub id: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: String,
    pub service_id: String,
    pub service_name: String,
    pub barber_id: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub duration_minutes: i64,
    pub price_cents: i64,
    pub status: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = DbError;

    fn try_from(db: DbAppointment) -> Result<Self, Self::Error> {
        let status = db
            .status
            .parse::<AppointmentStatus>()
            .map_err(|e| DbError::DecodeError(e.to_string()))?;
        Ok(Self {
            id: db.id,
            client_name: db.client_name,
            client_phone: db.client_phone,
            client_email: non_empty(db.client_email),
            service_id: db.service_id,
            service_name: db.service_name,
            barber_id: db.barber_id,
            appointment_date: db.appointment_date,
            appointment_time: db.appointment_time,
            duration_minutes: db.duration_minutes,
            price_cents: db.price_cents,
            status,
            notes: non_empty(db.notes),
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbStatusChange {
    pub id: String,
    pub appointment_id: String,
    pub from_status: String,
    pub to_status: String,
    pub changed_by: String,
    pub note: String,
    pub changed_at: String,
}

impl TryFrom<DbStatusChange> for StatusChange {
    type Error = DbError;

    fn try_from(db: DbStatusChange) -> Result<Self, Self::Error> {
        let decode = |s: &str| {
            s.parse::<AppointmentStatus>()
                .map_err(|e| DbError::DecodeError(e.to_string()))
        };
        Ok(Self {
            from_status: decode(&db.from_status)?,
            to_status: decode(&db.to_status)?,
            id: db.id,
            appointment_id: db.appointment_id,
            changed_by: db.changed_by,
            note: non_empty(db.note),
            changed_at: db.changed_at,
        })
    }
}

/// A non-cancelled booking occupying part of a barber's day.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct BookedTime {
    pub appointment_time: String,
    pub duration_minutes: i64,
}

/// Result of a guarded status update.
#[derive(Debug, Clone)]
pub enum StatusUpdate {
    Applied(Appointment),
    NotFound,
    /// Someone else changed the status first; carries the current row.
    Stale(Appointment),
}

pub trait AppointmentRepository: SchemaInit {
    /// Insert a fully populated appointment inside a transaction.
    ///
    /// Fails with [`DbError::UniqueViolation`] when the barber's slot is already held
    /// by a non-cancelled appointment.
    fn insert_appointment(
        &self,
        appointment: Appointment,
    ) -> impl std::future::Future<Output = Result<Appointment, DbError>> + Send;

    fn find_appointment(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Appointment>, DbError>> + Send;

    /// Filtered list ordered by date then time.
    fn list_appointments(
        &self,
        filter: AppointmentFilter,
    ) -> impl std::future::Future<Output = Result<Vec<Appointment>, DbError>> + Send;

    fn booked_times(
        &self,
        barber_id: &str,
        date: &str,
    ) -> impl std::future::Future<Output = Result<Vec<BookedTime>, DbError>> + Send;

    /// Move `id` from `expected` to `to` only if it is still in `expected`, recording
    /// the transition in the history table in the same transaction.
    fn update_status(
        &self,
        id: &str,
        expected: AppointmentStatus,
        to: AppointmentStatus,
        changed_by: &str,
        note: Option<String>,
    ) -> impl std::future::Future<Output = Result<StatusUpdate, DbError>> + Send;

    fn status_history(
        &self,
        appointment_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<StatusChange>, DbError>> + Send;

    /// Hard delete including history. Returns the deleted row, if any.
    fn delete_appointment(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Appointment>, DbError>> + Send;
}
