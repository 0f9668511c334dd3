// File: crates/barbershop_admin/src/handlers.rs
use crate::auth::AdminActor;
use crate::error::AdminError;
use crate::logic::{AccessCheck, AdminService, ReportRows, UserApproval};
use crate::validation::WorkingHoursInput;
use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
};
use barbershop_common::models::{
    AccessRecord, AccessStatus, Appointment, AppointmentFilter, AppointmentStatus, Barber,
    BarberInput, BarberPatch, BarberReportRow, DailyReportRow, Notification, Service,
    ServiceInput, ServicePatch, ServiceReportRow, StatusChange, SummaryReport, WorkingHours,
};
use barbershop_common::BarbershopError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone)]
pub struct AdminState {
    pub service: AdminService,
}

// --- Request / response bodies ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccessRequestBody {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct UserListQuery {
    /// pending, approved or rejected
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct NotificationListQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AppointmentListQuery {
    pub date: Option<String>,
    pub status: Option<String>,
    pub barber_id: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusChangeBody {
    pub status: AppointmentStatus,
    pub note: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ReportQuery {
    /// Inclusive, defaults to the first day of the current month
    pub from: Option<String>,
    /// Inclusive, defaults to the last day of the current month
    pub to: Option<String>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_filter<T: std::str::FromStr>(value: Option<String>) -> Result<Option<T>, AdminError>
where
    T::Err: std::fmt::Display,
{
    blank_to_none(value)
        .map(|v| v.parse::<T>())
        .transpose()
        .map_err(|e| AdminError::Validation(e.to_string()))
}

// --- Access (public) ---

/// Ask for access to the admin area. Creates a `new_user` notification for admins.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/access-requests",
    request_body = AccessRequestBody,
    responses(
        (status = 200, description = "Current access record", body = AccessRecord),
        (status = 400, description = "Invalid email")
    ),
    tag = "Access"
))]
pub async fn request_access_handler(
    State(state): State<Arc<AdminState>>,
    Json(body): Json<AccessRequestBody>,
) -> Result<Json<AccessRecord>, BarbershopError> {
    let record = state
        .service
        .request_access(&body.email, body.name)
        .await?;
    Ok(Json(record))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/access/{email}",
    params(("email" = String, Path, description = "Email to check")),
    responses((status = 200, description = "pending, approved, rejected or unknown", body = AccessCheck)),
    tag = "Access"
))]
pub async fn access_status_handler(
    State(state): State<Arc<AdminState>>,
    Path(email): Path<String>,
) -> Result<Json<AccessCheck>, BarbershopError> {
    Ok(Json(state.service.access_status(&email).await?))
}

// --- Users ---

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/users",
    params(UserListQuery),
    responses((status = 200, description = "Access records, newest first", body = Vec<AccessRecord>)),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn list_users_handler(
    State(state): State<Arc<AdminState>>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<AccessRecord>>, BarbershopError> {
    let status = parse_filter::<AccessStatus>(query.status)?;
    Ok(Json(state.service.list_users(status).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/users/{email}/approve",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Approved", body = AccessRecord),
        (status = 404, description = "No request for this email"),
        (status = 409, description = "Already rejected")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn approve_user_handler(
    State(state): State<Arc<AdminState>>,
    Extension(actor): Extension<AdminActor>,
    Path(email): Path<String>,
) -> Result<Json<AccessRecord>, BarbershopError> {
    let record = state
        .service
        .decide_user(&email, AccessStatus::Approved, &actor.0)
        .await?;
    Ok(Json(record))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/users/{email}/reject",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Rejected", body = AccessRecord),
        (status = 404, description = "No request for this email"),
        (status = 409, description = "Already approved")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn reject_user_handler(
    State(state): State<Arc<AdminState>>,
    Extension(actor): Extension<AdminActor>,
    Path(email): Path<String>,
) -> Result<Json<AccessRecord>, BarbershopError> {
    let record = state
        .service
        .decide_user(&email, AccessStatus::Rejected, &actor.0)
        .await?;
    Ok(Json(record))
}

// --- Notifications ---

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/notifications",
    params(NotificationListQuery),
    responses((status = 200, description = "Notifications, newest first", body = Vec<Notification>)),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn list_notifications_handler(
    State(state): State<Arc<AdminState>>,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<Vec<Notification>>, BarbershopError> {
    Ok(Json(
        state.service.list_notifications(query.unread_only).await?,
    ))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked read", body = Notification),
        (status = 404, description = "Not found")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn mark_notification_read_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
) -> Result<Json<Notification>, BarbershopError> {
    Ok(Json(state.service.mark_notification_read(&id).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/notifications/read-all",
    responses((status = 200, description = "Number of notifications marked read", body = MarkAllReadResponse)),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn mark_all_read_handler(
    State(state): State<Arc<AdminState>>,
) -> Result<Json<MarkAllReadResponse>, BarbershopError> {
    let updated = state.service.mark_all_notifications_read().await?;
    Ok(Json(MarkAllReadResponse { updated }))
}

/// Approve the user a `new_user` notification refers to and mark it read, atomically.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/notifications/{id}/approve-user",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 200, description = "User approved", body = UserApproval),
        (status = 400, description = "Notification has no email"),
        (status = 404, description = "Notification not found"),
        (status = 409, description = "User was rejected")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn approve_user_from_notification_handler(
    State(state): State<Arc<AdminState>>,
    Extension(actor): Extension<AdminActor>,
    Path(id): Path<String>,
) -> Result<Json<UserApproval>, BarbershopError> {
    let approval = state
        .service
        .approve_from_notification(&id, &actor.0)
        .await?;
    Ok(Json(approval))
}

// --- Appointments ---

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/appointments",
    params(AppointmentListQuery),
    responses(
        (status = 200, description = "Appointments by date then time", body = Vec<Appointment>),
        (status = 400, description = "Unknown status filter")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn list_appointments_handler(
    State(state): State<Arc<AdminState>>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Vec<Appointment>>, BarbershopError> {
    let filter = AppointmentFilter {
        date: blank_to_none(query.date),
        status: parse_filter::<AppointmentStatus>(query.status)?,
        barber_id: blank_to_none(query.barber_id),
    };
    Ok(Json(state.service.list_appointments(filter).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/appointments/{id}/status",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = StatusChangeBody,
    responses(
        (status = 200, description = "Updated appointment", body = Appointment),
        (status = 404, description = "Not found"),
        (status = 409, description = "Transition not allowed")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn change_status_handler(
    State(state): State<Arc<AdminState>>,
    Extension(actor): Extension<AdminActor>,
    Path(id): Path<String>,
    Json(body): Json<StatusChangeBody>,
) -> Result<Json<Appointment>, BarbershopError> {
    let appointment = state
        .service
        .change_appointment_status(&id, body.status, &actor.0, body.note)
        .await?;
    Ok(Json(appointment))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/appointments/{id}/history",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Status changes, oldest first", body = Vec<StatusChange>),
        (status = 404, description = "Not found")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn appointment_history_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<StatusChange>>, BarbershopError> {
    Ok(Json(state.service.appointment_history(&id).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/admin/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Deleted appointment", body = Appointment),
        (status = 404, description = "Not found")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn delete_appointment_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, BarbershopError> {
    Ok(Json(state.service.delete_appointment(&id).await?))
}

// --- Barbers ---

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/barbers",
    responses((status = 200, description = "All barbers, including inactive", body = Vec<Barber>)),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn list_barbers_handler(
    State(state): State<Arc<AdminState>>,
) -> Result<Json<Vec<Barber>>, BarbershopError> {
    Ok(Json(state.service.list_barbers().await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/barbers",
    request_body = BarberInput,
    responses(
        (status = 200, description = "Created barber", body = Barber),
        (status = 400, description = "Invalid input")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn create_barber_handler(
    State(state): State<Arc<AdminState>>,
    Json(input): Json<BarberInput>,
) -> Result<Json<Barber>, BarbershopError> {
    Ok(Json(state.service.create_barber(input).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/admin/barbers/{id}",
    params(("id" = String, Path, description = "Barber id")),
    request_body = BarberPatch,
    responses(
        (status = 200, description = "Updated barber", body = Barber),
        (status = 404, description = "Not found")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn update_barber_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
    Json(patch): Json<BarberPatch>,
) -> Result<Json<Barber>, BarbershopError> {
    Ok(Json(state.service.update_barber(&id, patch).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/barbers/{id}/toggle-active",
    params(("id" = String, Path, description = "Barber id")),
    responses(
        (status = 200, description = "Barber with flipped active flag", body = Barber),
        (status = 404, description = "Not found")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn toggle_barber_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
) -> Result<Json<Barber>, BarbershopError> {
    Ok(Json(state.service.toggle_barber_active(&id).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/barbers/{id}/working-hours",
    params(("id" = String, Path, description = "Barber id")),
    responses(
        (status = 200, description = "Weekly schedule", body = Vec<WorkingHours>),
        (status = 404, description = "Not found")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn get_working_hours_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<WorkingHours>>, BarbershopError> {
    Ok(Json(state.service.working_hours(&id).await?))
}

/// Replace the whole weekly schedule. Weekdays left out become days off.
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/admin/barbers/{id}/working-hours",
    params(("id" = String, Path, description = "Barber id")),
    request_body = Vec<WorkingHoursInput>,
    responses(
        (status = 200, description = "Saved schedule", body = Vec<WorkingHours>),
        (status = 400, description = "Invalid schedule"),
        (status = 404, description = "Not found")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn put_working_hours_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
    Json(days): Json<Vec<WorkingHoursInput>>,
) -> Result<Json<Vec<WorkingHours>>, BarbershopError> {
    Ok(Json(state.service.replace_working_hours(&id, days).await?))
}

// --- Services ---

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/services",
    responses((status = 200, description = "All services, including inactive", body = Vec<Service>)),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn list_services_handler(
    State(state): State<Arc<AdminState>>,
) -> Result<Json<Vec<Service>>, BarbershopError> {
    Ok(Json(state.service.list_services().await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/services",
    request_body = ServiceInput,
    responses(
        (status = 200, description = "Created service", body = Service),
        (status = 400, description = "Invalid input")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn create_service_handler(
    State(state): State<Arc<AdminState>>,
    Json(input): Json<ServiceInput>,
) -> Result<Json<Service>, BarbershopError> {
    Ok(Json(state.service.create_service(input).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/admin/services/{id}",
    params(("id" = String, Path, description = "Service id")),
    request_body = ServicePatch,
    responses(
        (status = 200, description = "Updated service", body = Service),
        (status = 404, description = "Not found")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn update_service_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
    Json(patch): Json<ServicePatch>,
) -> Result<Json<Service>, BarbershopError> {
    Ok(Json(state.service.update_service(&id, patch).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/admin/services/{id}",
    params(("id" = String, Path, description = "Service id")),
    responses(
        (status = 200, description = "Deactivated service", body = Service),
        (status = 404, description = "Not found")
    ),
    security(("admin_secret" = [])),
    tag = "Admin"
))]
pub async fn delete_service_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
) -> Result<Json<Service>, BarbershopError> {
    Ok(Json(state.service.deactivate_service(&id).await?))
}

// --- Reports ---

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/reports/summary",
    params(ReportQuery),
    responses(
        (status = 200, description = "Totals per status and completed revenue", body = SummaryReport),
        (status = 400, description = "Invalid range")
    ),
    security(("admin_secret" = [])),
    tag = "Reports"
))]
pub async fn summary_report_handler(
    State(state): State<Arc<AdminState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<SummaryReport>, BarbershopError> {
    let report = state
        .service
        .summary_report(query.from.as_deref(), query.to.as_deref())
        .await?;
    Ok(Json(report))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/reports/by-barber",
    params(ReportQuery),
    responses(
        (status = 200, description = "Totals per barber", body = ReportRows<BarberReportRow>),
        (status = 400, description = "Invalid range")
    ),
    security(("admin_secret" = [])),
    tag = "Reports"
))]
pub async fn barber_report_handler(
    State(state): State<Arc<AdminState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportRows<BarberReportRow>>, BarbershopError> {
    let report = state
        .service
        .barber_report(query.from.as_deref(), query.to.as_deref())
        .await?;
    Ok(Json(report))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/reports/by-service",
    params(ReportQuery),
    responses(
        (status = 200, description = "Totals per service", body = ReportRows<ServiceReportRow>),
        (status = 400, description = "Invalid range")
    ),
    security(("admin_secret" = [])),
    tag = "Reports"
))]
pub async fn service_report_handler(
    State(state): State<Arc<AdminState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportRows<ServiceReportRow>>, BarbershopError> {
    let report = state
        .service
        .service_report(query.from.as_deref(), query.to.as_deref())
        .await?;
    Ok(Json(report))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/reports/daily",
    params(ReportQuery),
    responses(
        (status = 200, description = "Counts per day", body = ReportRows<DailyReportRow>),
        (status = 400, description = "Invalid range")
    ),
    security(("admin_secret" = [])),
    tag = "Reports"
))]
pub async fn daily_report_handler(
    State(state): State<Arc<AdminState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportRows<DailyReportRow>>, BarbershopError> {
    let report = state
        .service
        .daily_report(query.from.as_deref(), query.to.as_deref())
        .await?;
    Ok(Json(report))
}
