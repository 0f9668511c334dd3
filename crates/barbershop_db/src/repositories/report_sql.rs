//! SQL implementation of the report repository

use crate::error::DbError;
use crate::repositories::report::{
    BarberReportRow, DailyReportRow, DbBarberTotal, DbDailyTotal, DbServiceTotal, DbStatusTotal,
    ReportRepository, ServiceReportRow, StatusCounts, SummaryReport,
};
use crate::DbClient;
use barbershop_common::models::AppointmentStatus;
use tracing::{debug, warn};

// CASTs keep every aggregate a 64-bit integer across SQLite, Postgres and MySQL.
const COMPLETED_COUNT: &str =
    "CAST(COALESCE(SUM(CASE WHEN a.status = 'completed' THEN 1 ELSE 0 END), 0) AS BIGINT)";
const COMPLETED_REVENUE: &str =
    "CAST(COALESCE(SUM(CASE WHEN a.status = 'completed' THEN a.price_cents ELSE 0 END), 0) AS BIGINT)";

#[derive(Debug, Clone)]
pub struct SqlReportRepository {
    db_client: DbClient,
}

impl SqlReportRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl ReportRepository for SqlReportRepository {
    async fn summary(&self, from: &str, to: &str) -> Result<SummaryReport, DbError> {
        debug!("Summary report {}..={}", from, to);

        let rows = sqlx::query_as::<_, DbStatusTotal>(
            r#"
            SELECT a.status AS status,
                   CAST(COUNT(*) AS BIGINT) AS total,
                   CAST(COALESCE(SUM(a.price_cents), 0) AS BIGINT) AS revenue
            FROM appointments a
            WHERE a.appointment_date >= $1 AND a.appointment_date <= $2
            GROUP BY a.status
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| DbError::query("Failed to build summary report", e))?;

        let mut by_status = StatusCounts::default();
        let mut total_appointments = 0;
        let mut revenue_cents = 0;
        for row in rows {
            total_appointments += row.total;
            match row.status.parse::<AppointmentStatus>() {
                Ok(status) => {
                    by_status.add(status, row.total);
                    if status == AppointmentStatus::Completed {
                        revenue_cents += row.revenue;
                    }
                }
                Err(e) => warn!("Skipping unknown status in report: {}", e),
            }
        }

        Ok(SummaryReport {
            from: from.to_string(),
            to: to.to_string(),
            total_appointments,
            by_status,
            revenue_cents,
        })
    }

    async fn by_barber(&self, from: &str, to: &str) -> Result<Vec<BarberReportRow>, DbError> {
        let query = format!(
            r#"
            SELECT a.barber_id AS barber_id,
                   COALESCE(b.name, '') AS barber_name,
                   CAST(COUNT(*) AS BIGINT) AS total,
                   {completed} AS completed,
                   {revenue} AS revenue
            FROM appointments a
            LEFT JOIN barbers b ON b.id = a.barber_id
            WHERE a.appointment_date >= $1 AND a.appointment_date <= $2
            GROUP BY a.barber_id, b.name
            ORDER BY revenue DESC, a.barber_id
            "#,
            completed = COMPLETED_COUNT,
            revenue = COMPLETED_REVENUE,
        );

        let rows = sqlx::query_as::<_, DbBarberTotal>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to build barber report", e))?;

        Ok(rows.into_iter().map(BarberReportRow::from).collect())
    }

    async fn by_service(&self, from: &str, to: &str) -> Result<Vec<ServiceReportRow>, DbError> {
        let query = format!(
            r#"
            SELECT a.service_id AS service_id,
                   a.service_name AS service_name,
                   CAST(COUNT(*) AS BIGINT) AS total,
                   {completed} AS completed,
                   {revenue} AS revenue
            FROM appointments a
            WHERE a.appointment_date >= $1 AND a.appointment_date <= $2
            GROUP BY a.service_id, a.service_name
            ORDER BY revenue DESC, a.service_id
            "#,
            completed = COMPLETED_COUNT,
            revenue = COMPLETED_REVENUE,
        );

        let rows = sqlx::query_as::<_, DbServiceTotal>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to build service report", e))?;

        Ok(rows.into_iter().map(ServiceReportRow::from).collect())
    }

    async fn daily(&self, from: &str, to: &str) -> Result<Vec<DailyReportRow>, DbError> {
        let query = format!(
            r#"
            SELECT a.appointment_date AS appointment_date,
                   CAST(COUNT(*) AS BIGINT) AS total,
                   {completed} AS completed,
                   CAST(COALESCE(SUM(CASE WHEN a.status = 'cancelled' THEN 1 ELSE 0 END), 0) AS BIGINT) AS cancelled
            FROM appointments a
            WHERE a.appointment_date >= $1 AND a.appointment_date <= $2
            GROUP BY a.appointment_date
            ORDER BY a.appointment_date
            "#,
            completed = COMPLETED_COUNT,
        );

        let rows = sqlx::query_as::<_, DbDailyTotal>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::query("Failed to build daily report", e))?;

        Ok(rows.into_iter().map(DailyReportRow::from).collect())
    }
}
