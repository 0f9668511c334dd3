//! Aggregate queries over appointments for the admin reports

use crate::error::DbError;
use crate::repositories::non_empty;
use sqlx::FromRow;

pub use barbershop_common::models::{
    BarberReportRow, DailyReportRow, ServiceReportRow, StatusCounts, SummaryReport,
};

#[derive(Debug, Clone, FromRow)]
pub struct DbStatusTotal {
    pub status: String,
    pub total: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbBarberTotal {
    pub barber_id: String,
    pub barber_name: String,
    pub total: i64,
    pub completed: i64,
    pub revenue: i64,
}

impl From<DbBarberTotal> for BarberReportRow {
    fn from(db: DbBarberTotal) -> Self {
        Self {
            barber_id: db.barber_id,
            barber_name: non_empty(db.barber_name),
            total_appointments: db.total,
            completed_appointments: db.completed,
            revenue_cents: db.revenue,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbServiceTotal {
    pub service_id: String,
    pub service_name: String,
    pub total: i64,
    pub completed: i64,
    pub revenue: i64,
}

impl From<DbServiceTotal> for ServiceReportRow {
    fn from(db: DbServiceTotal) -> Self {
        Self {
            service_id: db.service_id,
            service_name: db.service_name,
            total_appointments: db.total,
            completed_appointments: db.completed,
            revenue_cents: db.revenue,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbDailyTotal {
    pub appointment_date: String,
    pub total: i64,
    pub completed: i64,
    pub cancelled: i64,
}

impl From<DbDailyTotal> for DailyReportRow {
    fn from(db: DbDailyTotal) -> Self {
        Self {
            date: db.appointment_date,
            total_appointments: db.total,
            completed_appointments: db.completed,
            cancelled_appointments: db.cancelled,
        }
    }
}

/// All ranges are inclusive `YYYY-MM-DD` bounds on `appointment_date`.
pub trait ReportRepository {
    fn summary(
        &self,
        from: &str,
        to: &str,
    ) -> impl std::future::Future<Output = Result<SummaryReport, DbError>> + Send;

    fn by_barber(
        &self,
        from: &str,
        to: &str,
    ) -> impl std::future::Future<Output = Result<Vec<BarberReportRow>, DbError>> + Send;

    fn by_service(
        &self,
        from: &str,
        to: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ServiceReportRow>, DbError>> + Send;

    fn daily(
        &self,
        from: &str,
        to: &str,
    ) -> impl std::future::Future<Output = Result<Vec<DailyReportRow>, DbError>> + Send;
}
