//! Repository modules for database access
//!
//! Each table family has a trait (`<entity>.rs`) and a SQL implementation
//! (`<entity>_sql.rs`) over the shared `DbClient`.

pub mod access;
pub mod access_sql;
pub mod appointment;
pub mod appointment_sql;
pub mod barber;
pub mod barber_sql;
pub mod notification;
pub mod notification_sql;
pub mod report;
pub mod report_sql;
pub mod service;
pub mod service_sql;

pub use access::{AccessRepository, AccessRequestOutcome, Decision, NotificationApproval};
pub use access_sql::SqlAccessRepository;
pub use appointment::{AppointmentRepository, BookedTime, StatusUpdate};
pub use appointment_sql::SqlAppointmentRepository;
pub use barber::BarberRepository;
pub use barber_sql::SqlBarberRepository;
pub use notification::NotificationRepository;
pub use notification_sql::SqlNotificationRepository;
pub use report::ReportRepository;
pub use report_sql::SqlReportRepository;
pub use service::ServiceRepository;
pub use service_sql::SqlServiceRepository;

/// Nullable text columns are selected as `COALESCE(col, '')` because the
/// `Any` driver cannot decode NULL; the empty string maps back to `None`.
pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
