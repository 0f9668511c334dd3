// File: crates/barbershop_admin/src/doc.rs

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{
    AccessRequestBody, MarkAllReadResponse, StatusChangeBody,
};
use crate::logic::{AccessCheck, UserApproval};
use crate::validation::WorkingHoursInput;
use barbershop_common::models::{
    AccessRecord, AccessStatus, Appointment, AppointmentStatus, Barber, BarberInput, BarberPatch,
    BarberReportRow, DailyReportRow, Notification, NotificationKind, Service, ServiceInput,
    ServicePatch, ServiceReportRow, StatusChange, StatusCounts, SummaryReport, WorkingHours,
};

struct AdminSecurity;

impl Modify for AdminSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_secret",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(
                    crate::auth::ADMIN_AUTH_HEADER,
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::request_access_handler,
        crate::handlers::access_status_handler,
        crate::handlers::list_users_handler,
        crate::handlers::approve_user_handler,
        crate::handlers::reject_user_handler,
        crate::handlers::list_notifications_handler,
        crate::handlers::mark_notification_read_handler,
        crate::handlers::mark_all_read_handler,
        crate::handlers::approve_user_from_notification_handler,
        crate::handlers::list_appointments_handler,
        crate::handlers::change_status_handler,
        crate::handlers::appointment_history_handler,
        crate::handlers::delete_appointment_handler,
        crate::handlers::list_barbers_handler,
        crate::handlers::create_barber_handler,
        crate::handlers::update_barber_handler,
        crate::handlers::toggle_barber_handler,
        crate::handlers::get_working_hours_handler,
        crate::handlers::put_working_hours_handler,
        crate::handlers::list_services_handler,
        crate::handlers::create_service_handler,
        crate::handlers::update_service_handler,
        crate::handlers::delete_service_handler,
        crate::handlers::summary_report_handler,
        crate::handlers::barber_report_handler,
        crate::handlers::service_report_handler,
        crate::handlers::daily_report_handler
    ),
    components(
        schemas(
            AccessRequestBody,
            AccessCheck,
            AccessRecord,
            AccessStatus,
            UserApproval,
            Notification,
            NotificationKind,
            MarkAllReadResponse,
            Appointment,
            AppointmentStatus,
            StatusChangeBody,
            StatusChange,
            Barber,
            BarberInput,
            BarberPatch,
            WorkingHours,
            WorkingHoursInput,
            Service,
            ServiceInput,
            ServicePatch,
            SummaryReport,
            StatusCounts,
            BarberReportRow,
            ServiceReportRow,
            DailyReportRow
        )
    ),
    modifiers(&AdminSecurity),
    tags(
        (name = "Access", description = "Public access requests"),
        (name = "Admin", description = "Shop administration, requires X-Admin-Secret"),
        (name = "Reports", description = "Appointment and revenue reports")
    ),
    servers(
        (url = "/api", description = "Barbershop API server")
    )
)]
pub struct AdminApiDoc;
