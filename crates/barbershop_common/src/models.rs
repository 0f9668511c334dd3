// --- File: crates/barbershop_common/src/models.rs ---

// Domain types shared by the database layer and the feature crates.
// Dates are "YYYY-MM-DD", times "HH:MM" (shop-local), timestamps RFC 3339 UTC.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a stored or submitted enum value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// Lifecycle of an appointment. Transition rules live in the booking crate.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(UnknownVariant {
                kind: "appointment status",
                value: s.to_string(),
            }),
        }
    }
}

/// Decision state of an email-based access request.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessStatus {
    Pending,
    Approved,
    Rejected,
}

impl AccessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessStatus::Pending => "pending",
            AccessStatus::Approved => "approved",
            AccessStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for AccessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(AccessStatus::Pending),
            "approved" => Ok(AccessStatus::Approved),
            "rejected" => Ok(AccessStatus::Rejected),
            _ => Err(UnknownVariant {
                kind: "access status",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewAppointment,
    StatusChanged,
    NewUser,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NewAppointment => "new_appointment",
            NotificationKind::StatusChanged => "status_changed",
            NotificationKind::NewUser => "new_user",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_appointment" => Ok(NotificationKind::NewAppointment),
            "status_changed" => Ok(NotificationKind::StatusChanged),
            "new_user" => Ok(NotificationKind::NewUser),
            _ => Err(UnknownVariant {
                kind: "notification kind",
                value: s.to_string(),
            }),
        }
    }
}

/// A bookable service from the public catalogue.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Price in the smallest currency unit.
    pub price_cents: i64,
    pub duration_minutes: i64,
    pub active: bool,
    pub created_at: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Barber {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub specialties: Vec<String>,
    pub active: bool,
    pub created_at: String,
}

/// One weekday of a barber's schedule. `weekday` is 0 = Monday .. 6 = Sunday.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkingHours {
    pub barber_id: String,
    pub weekday: u8,
    pub start_time: String,
    pub end_time: String,
    pub break_start: Option<String>,
    pub break_end: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub service_id: String,
    /// Copied at booking time so later catalogue edits do not rewrite history.
    pub service_name: String,
    pub barber_id: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub duration_minutes: i64,
    pub price_cents: i64,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Audit trail row written for every status transition.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChange {
    pub id: String,
    pub appointment_id: String,
    pub from_status: AppointmentStatus,
    pub to_status: AppointmentStatus,
    pub changed_by: String,
    pub note: Option<String>,
    pub changed_at: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessRecord {
    pub email: String,
    pub name: Option<String>,
    pub status: AccessStatus,
    pub requested_at: String,
    pub decided_at: Option<String>,
    pub decided_by: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Set for access-request notifications; used by approve-from-notification.
    pub email: Option<String>,
    pub appointment_id: Option<String>,
    pub read: bool,
    pub created_at: String,
}

// --- Write inputs ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInput {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_minutes: i64,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Partial update; absent fields keep their stored value.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub duration_minutes: Option<i64>,
    pub active: Option<bool>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarberInput {
    pub name: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BarberPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub active: Option<bool>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub date: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub barber_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub email: Option<String>,
    pub appointment_id: Option<String>,
}

// --- Reports ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusCounts {
    pub pending: i64,
    pub confirmed: i64,
    pub completed: i64,
    pub cancelled: i64,
}

impl StatusCounts {
    pub fn add(&mut self, status: AppointmentStatus, count: i64) {
        match status {
            AppointmentStatus::Pending => self.pending += count,
            AppointmentStatus::Confirmed => self.confirmed += count,
            AppointmentStatus::Completed => self.completed += count,
            AppointmentStatus::Cancelled => self.cancelled += count,
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryReport {
    pub from: String,
    pub to: String,
    pub total_appointments: i64,
    pub by_status: StatusCounts,
    /// Sum of `price_cents` over completed appointments.
    pub revenue_cents: i64,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BarberReportRow {
    pub barber_id: String,
    pub barber_name: Option<String>,
    pub total_appointments: i64,
    pub completed_appointments: i64,
    pub revenue_cents: i64,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceReportRow {
    pub service_id: String,
    pub service_name: String,
    pub total_appointments: i64,
    pub completed_appointments: i64,
    pub revenue_cents: i64,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyReportRow {
    pub date: String,
    pub total_appointments: i64,
    pub completed_appointments: i64,
    pub cancelled_appointments: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in AppointmentStatus::ALL {
            assert_eq!(status.as_str().parse::<AppointmentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_accepts_american_spelling() {
        assert_eq!(
            "Canceled".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::Cancelled
        );
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = "approved".parse::<AppointmentStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown appointment status 'approved'");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&AppointmentStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
        let kind = serde_json::to_string(&NotificationKind::NewAppointment).unwrap();
        assert_eq!(kind, "\"new_appointment\"");
    }
}
