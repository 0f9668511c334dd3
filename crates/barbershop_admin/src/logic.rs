// --- File: crates/barbershop_admin/src/logic.rs ---

//! Admin operations. Every write publishes a change event after it commits.

use crate::error::AdminError;
use crate::validation::{
    normalize_email, resolve_report_range, validate_barber_input, validate_barber_patch,
    validate_service_input, validate_service_patch, validate_working_hours, WorkingHoursInput,
};
use barbershop_booking::BookingService;
use barbershop_common::events::{
    TABLE_APPOINTMENTS, TABLE_APPROVED_USERS, TABLE_BARBERS, TABLE_NOTIFICATIONS, TABLE_SERVICES,
    TABLE_WORKING_HOURS,
};
use barbershop_common::models::{
    AccessRecord, AccessStatus, Appointment, AppointmentFilter, AppointmentStatus, Barber,
    BarberInput, BarberPatch, BarberReportRow, DailyReportRow, NewNotification, Notification,
    NotificationKind, Service, ServiceInput, ServicePatch, ServiceReportRow, StatusChange,
    SummaryReport, WorkingHours,
};
use barbershop_common::{ChangeAction, ChangeEvent};
use barbershop_db::{
    AccessRepository, AppointmentRepository, BarberRepository, Decision, NotificationApproval,
    NotificationRepository, ReportRepository, Repositories, ServiceRepository,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Public view of an email's access state. `status` is `unknown` for emails never seen.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AccessCheck {
    pub email: String,
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserApproval {
    pub user: AccessRecord,
    pub notification: Notification,
}

/// Inclusive date range a report was computed for, echoed back with the rows.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ReportRows<T> {
    pub from: String,
    pub to: String,
    pub rows: Vec<T>,
}

#[derive(Clone)]
pub struct AdminService {
    booking: BookingService,
}

impl AdminService {
    pub fn new(booking: BookingService) -> Self {
        Self { booking }
    }

    pub fn booking(&self) -> &BookingService {
        &self.booking
    }

    fn repos(&self) -> &Repositories {
        self.booking.repos()
    }

    fn publish<T: Serialize>(&self, table: &str, action: ChangeAction, id: &str, payload: &T) {
        self.booking
            .feed()
            .publish(ChangeEvent::new(table, action, id, payload));
    }

    // --- Access approvals ---

    /// Register (or refresh) an access request and notify admins when a review opens.
    pub async fn request_access(
        &self,
        email: &str,
        name: Option<String>,
    ) -> Result<AccessRecord, AdminError> {
        let email = normalize_email(email)?;
        let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let outcome = self.repos().access.request_access(&email, name).await?;

        if outcome.opened {
            info!("Access requested by {}", email);
            self.publish(
                TABLE_APPROVED_USERS,
                ChangeAction::Insert,
                &email,
                &outcome.record,
            );
            let who = outcome.record.name.as_deref().unwrap_or(&email).to_string();
            let notification = self
                .repos()
                .notifications
                .create_notification(NewNotification {
                    kind: NotificationKind::NewUser,
                    title: "New access request".to_string(),
                    message: format!("{} ({}) is waiting for approval", who, email),
                    email: Some(email.clone()),
                    appointment_id: None,
                })
                .await;
            match notification {
                Ok(n) => self.publish(TABLE_NOTIFICATIONS, ChangeAction::Insert, &n.id, &n),
                Err(e) => warn!("Failed to record access request notification: {}", e),
            }
        }
        Ok(outcome.record)
    }

    pub async fn access_status(&self, email: &str) -> Result<AccessCheck, AdminError> {
        let email = normalize_email(email)?;
        let status = self
            .repos()
            .access
            .find_access(&email)
            .await?
            .map_or("unknown", |r| r.status.as_str());
        Ok(AccessCheck {
            email,
            status: status.to_string(),
        })
    }

    pub async fn list_users(
        &self,
        status: Option<AccessStatus>,
    ) -> Result<Vec<AccessRecord>, AdminError> {
        Ok(self.repos().access.list_access(status).await?)
    }

    /// Approve or reject a pending request. Repeating the same decision is a no-op.
    pub async fn decide_user(
        &self,
        email: &str,
        decision: AccessStatus,
        decided_by: &str,
    ) -> Result<AccessRecord, AdminError> {
        if decision == AccessStatus::Pending {
            return Err(AdminError::Validation(
                "a decision must be approved or rejected".to_string(),
            ));
        }
        let email = normalize_email(email)?;
        match self
            .repos()
            .access
            .decide(&email, decision, decided_by)
            .await?
        {
            Decision::Applied(record) => {
                info!("{} {} by {}", email, record.status, decided_by);
                self.publish(TABLE_APPROVED_USERS, ChangeAction::Update, &email, &record);
                Ok(record)
            }
            Decision::Unchanged(record) => Ok(record),
            Decision::NotFound => Err(AdminError::NotFound(format!(
                "no access request for {}",
                email
            ))),
            Decision::Conflict(record) => Err(AdminError::Conflict(format!(
                "{} was already {}",
                email, record.status
            ))),
        }
    }

    pub async fn approve_from_notification(
        &self,
        notification_id: &str,
        decided_by: &str,
    ) -> Result<UserApproval, AdminError> {
        match self
            .repos()
            .access
            .approve_from_notification(notification_id, decided_by)
            .await?
        {
            NotificationApproval::Approved {
                record,
                notification,
            } => {
                info!(
                    "{} approved from notification {} by {}",
                    record.email, notification_id, decided_by
                );
                self.publish(
                    TABLE_APPROVED_USERS,
                    ChangeAction::Update,
                    &record.email,
                    &record,
                );
                self.publish(
                    TABLE_NOTIFICATIONS,
                    ChangeAction::Update,
                    &notification.id,
                    &notification,
                );
                Ok(UserApproval {
                    user: record,
                    notification,
                })
            }
            NotificationApproval::NotificationNotFound => Err(AdminError::NotFound(format!(
                "notification {} not found",
                notification_id
            ))),
            NotificationApproval::MissingEmail => Err(AdminError::Validation(format!(
                "notification {} does not reference a user",
                notification_id
            ))),
            NotificationApproval::Conflict(record) => Err(AdminError::Conflict(format!(
                "{} was already {}",
                record.email, record.status
            ))),
        }
    }

    // --- Notifications ---

    pub async fn list_notifications(
        &self,
        unread_only: bool,
    ) -> Result<Vec<Notification>, AdminError> {
        Ok(self
            .repos()
            .notifications
            .list_notifications(unread_only)
            .await?)
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<Notification, AdminError> {
        let notification = self
            .repos()
            .notifications
            .mark_read(id)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("notification {} not found", id)))?;
        self.publish(TABLE_NOTIFICATIONS, ChangeAction::Update, id, &notification);
        Ok(notification)
    }

    pub async fn mark_all_notifications_read(&self) -> Result<u64, AdminError> {
        let updated = self.repos().notifications.mark_all_read().await?;
        if updated > 0 {
            self.publish(
                TABLE_NOTIFICATIONS,
                ChangeAction::Update,
                "*",
                &serde_json::json!({ "updated": updated }),
            );
        }
        Ok(updated)
    }

    // --- Appointments ---

    pub async fn list_appointments(
        &self,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>, AdminError> {
        Ok(self.repos().appointments.list_appointments(filter).await?)
    }

    pub async fn change_appointment_status(
        &self,
        id: &str,
        to: AppointmentStatus,
        changed_by: &str,
        note: Option<String>,
    ) -> Result<Appointment, AdminError> {
        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        Ok(self.booking.change_status(id, to, changed_by, note).await?)
    }

    pub async fn appointment_history(&self, id: &str) -> Result<Vec<StatusChange>, AdminError> {
        self.booking.get_appointment(id).await?;
        Ok(self.repos().appointments.status_history(id).await?)
    }

    pub async fn delete_appointment(&self, id: &str) -> Result<Appointment, AdminError> {
        let deleted = self
            .repos()
            .appointments
            .delete_appointment(id)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("appointment {} not found", id)))?;
        info!("Appointment {} deleted", id);
        self.publish(TABLE_APPOINTMENTS, ChangeAction::Delete, id, &deleted);
        Ok(deleted)
    }

    // --- Barbers and working hours ---

    pub async fn list_barbers(&self) -> Result<Vec<Barber>, AdminError> {
        Ok(self.repos().barbers.list_barbers(false).await?)
    }

    pub async fn create_barber(&self, input: BarberInput) -> Result<Barber, AdminError> {
        let barber = self
            .repos()
            .barbers
            .create_barber(validate_barber_input(input)?)
            .await?;
        info!("Barber {} created ({})", barber.name, barber.id);
        self.publish(TABLE_BARBERS, ChangeAction::Insert, &barber.id, &barber);
        Ok(barber)
    }

    pub async fn update_barber(&self, id: &str, patch: BarberPatch) -> Result<Barber, AdminError> {
        let barber = self
            .repos()
            .barbers
            .update_barber(id, validate_barber_patch(patch)?)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("barber {} not found", id)))?;
        self.publish(TABLE_BARBERS, ChangeAction::Update, id, &barber);
        Ok(barber)
    }

    pub async fn toggle_barber_active(&self, id: &str) -> Result<Barber, AdminError> {
        let barber = self
            .repos()
            .barbers
            .toggle_barber_active(id)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("barber {} not found", id)))?;
        info!("Barber {} active={}", id, barber.active);
        self.publish(TABLE_BARBERS, ChangeAction::Update, id, &barber);
        Ok(barber)
    }

    async fn existing_barber(&self, id: &str) -> Result<Barber, AdminError> {
        self.repos()
            .barbers
            .find_barber(id)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("barber {} not found", id)))
    }

    pub async fn working_hours(&self, barber_id: &str) -> Result<Vec<WorkingHours>, AdminError> {
        self.existing_barber(barber_id).await?;
        Ok(self.repos().barbers.working_hours(barber_id).await?)
    }

    pub async fn replace_working_hours(
        &self,
        barber_id: &str,
        days: Vec<WorkingHoursInput>,
    ) -> Result<Vec<WorkingHours>, AdminError> {
        let rows = validate_working_hours(barber_id, &days)?;
        self.existing_barber(barber_id).await?;
        let saved = self
            .repos()
            .barbers
            .replace_working_hours(barber_id, rows)
            .await?;
        info!(
            "Working hours for barber {} replaced ({} days)",
            barber_id,
            saved.len()
        );
        self.publish(TABLE_WORKING_HOURS, ChangeAction::Update, barber_id, &saved);
        Ok(saved)
    }

    // --- Services ---

    pub async fn list_services(&self) -> Result<Vec<Service>, AdminError> {
        Ok(self.repos().services.list_services(false).await?)
    }

    pub async fn create_service(&self, input: ServiceInput) -> Result<Service, AdminError> {
        let service = self
            .repos()
            .services
            .create_service(validate_service_input(input)?)
            .await?;
        info!("Service {} created ({})", service.name, service.id);
        self.publish(TABLE_SERVICES, ChangeAction::Insert, &service.id, &service);
        Ok(service)
    }

    pub async fn update_service(
        &self,
        id: &str,
        patch: ServicePatch,
    ) -> Result<Service, AdminError> {
        let service = self
            .repos()
            .services
            .update_service(id, validate_service_patch(patch)?)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("service {} not found", id)))?;
        self.publish(TABLE_SERVICES, ChangeAction::Update, id, &service);
        Ok(service)
    }

    /// Soft delete: the service disappears from the catalogue but past appointments keep it.
    pub async fn deactivate_service(&self, id: &str) -> Result<Service, AdminError> {
        let service = self
            .repos()
            .services
            .set_service_active(id, false)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("service {} not found", id)))?;
        info!("Service {} deactivated", id);
        self.publish(TABLE_SERVICES, ChangeAction::Update, id, &service);
        Ok(service)
    }

    // --- Reports ---

    fn report_range(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<(String, String), AdminError> {
        let (from, to) = resolve_report_range(from, to, self.booking.now_local().date())?;
        Ok((
            from.format("%Y-%m-%d").to_string(),
            to.format("%Y-%m-%d").to_string(),
        ))
    }

    pub async fn summary_report(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<SummaryReport, AdminError> {
        let (from, to) = self.report_range(from, to)?;
        Ok(self.repos().reports.summary(&from, &to).await?)
    }

    pub async fn barber_report(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<ReportRows<BarberReportRow>, AdminError> {
        let (from, to) = self.report_range(from, to)?;
        let rows = self.repos().reports.by_barber(&from, &to).await?;
        Ok(ReportRows { from, to, rows })
    }

    pub async fn service_report(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<ReportRows<ServiceReportRow>, AdminError> {
        let (from, to) = self.report_range(from, to)?;
        let rows = self.repos().reports.by_service(&from, &to).await?;
        Ok(ReportRows { from, to, rows })
    }

    pub async fn daily_report(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<ReportRows<DailyReportRow>, AdminError> {
        let (from, to) = self.report_range(from, to)?;
        let rows = self.repos().reports.daily(&from, &to).await?;
        Ok(ReportRows { from, to, rows })
    }
}
