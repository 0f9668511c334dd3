//! Repository for barbers and their weekly working hours

use crate::error::DbError;
use crate::repositories::non_empty;
use crate::repository::SchemaInit;
use sqlx::FromRow;

pub use barbershop_common::models::{Barber, BarberInput, BarberPatch, WorkingHours};

#[derive(Debug, Clone, FromRow)]
pub struct DbBarber {
    pub id: String,
    pub name: String,
    pub phone: String,
    /// Comma separated list
    pub specialties: String,
    pub active: i64,
    pub created_at: String,
}

impl From<DbBarber> for Barber {
    fn from(db: DbBarber) -> Self {
        Self {
            id: db.id,
            name: db.name,
            phone: non_empty(db.phone),
            specialties: split_specialties(&db.specialties),
            active: db.active != 0,
            created_at: db.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbWorkingHours {
    pub barber_id: String,
    pub weekday: i64,
    pub start_time: String,
    pub end_time: String,
    pub break_start: String,
    pub break_end: String,
}

impl From<DbWorkingHours> for WorkingHours {
    fn from(db: DbWorkingHours) -> Self {
        Self {
            barber_id: db.barber_id,
            weekday: db.weekday.clamp(0, 6) as u8,
            start_time: db.start_time,
            end_time: db.end_time,
            break_start: non_empty(db.break_start),
            break_end: non_empty(db.break_end),
        }
    }
}

pub(crate) fn split_specialties(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn join_specialties(specialties: &[String]) -> String {
    specialties
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

pub trait BarberRepository: SchemaInit {
    fn list_barbers(
        &self,
        active_only: bool,
    ) -> impl std::future::Future<Output = Result<Vec<Barber>, DbError>> + Send;

    fn find_barber(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Barber>, DbError>> + Send;

    fn create_barber(
        &self,
        input: BarberInput,
    ) -> impl std::future::Future<Output = Result<Barber, DbError>> + Send;

    fn update_barber(
        &self,
        id: &str,
        patch: BarberPatch,
    ) -> impl std::future::Future<Output = Result<Option<Barber>, DbError>> + Send;

    /// Flip the `active` flag. Returns `None` when the id is unknown.
    fn toggle_barber_active(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Barber>, DbError>> + Send;

    /// All schedule rows for a barber, ordered by weekday.
    fn working_hours(
        &self,
        barber_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<WorkingHours>, DbError>> + Send;

    fn working_hours_for_weekday(
        &self,
        barber_id: &str,
        weekday: u8,
    ) -> impl std::future::Future<Output = Result<Option<WorkingHours>, DbError>> + Send;

    /// Replace the whole weekly schedule in one transaction.
    fn replace_working_hours(
        &self,
        barber_id: &str,
        hours: Vec<WorkingHours>,
    ) -> impl std::future::Future<Output = Result<Vec<WorkingHours>, DbError>> + Send;
}
