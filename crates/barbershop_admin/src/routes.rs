// --- File: crates/barbershop_admin/src/routes.rs ---

use crate::auth::{admin_auth_middleware, AdminAuthState};
use crate::handlers::*;
use crate::logic::AdminService;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tracing::info;

/// Access-request routes plus the `/admin` tree, relative to `/api`.
///
/// Only the `/admin` routes sit behind the shared-secret middleware.
pub fn routes(service: AdminService) -> Router {
    let config = service.booking().config().clone();
    let state = Arc::new(AdminState { service });
    let auth_state = Arc::new(AdminAuthState { config });

    let public = Router::new()
        .route("/access-requests", post(request_access_handler))
        .route("/access/{email}", get(access_status_handler));

    info!("💡 Admin: adding /admin routes behind X-Admin-Secret");
    let protected = Router::new()
        .route("/admin/users", get(list_users_handler))
        .route("/admin/users/{email}/approve", post(approve_user_handler))
        .route("/admin/users/{email}/reject", post(reject_user_handler))
        .route("/admin/notifications", get(list_notifications_handler))
        .route("/admin/notifications/read-all", post(mark_all_read_handler))
        .route(
            "/admin/notifications/{id}/read",
            post(mark_notification_read_handler),
        )
        .route(
            "/admin/notifications/{id}/approve-user",
            post(approve_user_from_notification_handler),
        )
        .route("/admin/appointments", get(list_appointments_handler))
        .route(
            "/admin/appointments/{id}",
            axum::routing::delete(delete_appointment_handler),
        )
        .route("/admin/appointments/{id}/status", post(change_status_handler))
        .route(
            "/admin/appointments/{id}/history",
            get(appointment_history_handler),
        )
        .route(
            "/admin/barbers",
            get(list_barbers_handler).post(create_barber_handler),
        )
        .route("/admin/barbers/{id}", put(update_barber_handler))
        .route("/admin/barbers/{id}/toggle-active", post(toggle_barber_handler))
        .route(
            "/admin/barbers/{id}/working-hours",
            get(get_working_hours_handler).put(put_working_hours_handler),
        )
        .route(
            "/admin/services",
            get(list_services_handler).post(create_service_handler),
        )
        .route(
            "/admin/services/{id}",
            put(update_service_handler).delete(delete_service_handler),
        )
        .route("/admin/reports/summary", get(summary_report_handler))
        .route("/admin/reports/by-barber", get(barber_report_handler))
        .route("/admin/reports/by-service", get(service_report_handler))
        .route("/admin/reports/daily", get(daily_report_handler))
        .layer(middleware::from_fn_with_state(
            auth_state,
            admin_auth_middleware,
        ));

    public.merge(protected).with_state(state)
}
