// --- File: crates/barbershop_messaging/src/routes.rs ---

use crate::handlers::{
    appointment_whatsapp_handler, calendar_link_handler, direct_whatsapp_handler, MessagingState,
};
use crate::service::MessagingService;
use axum::{middleware, routing::get, Router};
use barbershop_admin::{admin_auth_middleware, AdminAuthState};
use std::sync::Arc;

/// Deep-link routes, relative to `/api`. `/admin/whatsapp` shares the admin secret check.
pub fn routes(service: MessagingService) -> Router {
    let auth_state = Arc::new(AdminAuthState {
        config: service.booking().config().clone(),
    });
    let state = Arc::new(MessagingState { service });

    let admin = Router::new()
        .route("/admin/whatsapp", get(direct_whatsapp_handler))
        .layer(middleware::from_fn_with_state(
            auth_state,
            admin_auth_middleware,
        ));

    Router::new()
        .route("/appointments/{id}/whatsapp", get(appointment_whatsapp_handler))
        .route("/appointments/{id}/calendar-link", get(calendar_link_handler))
        .merge(admin)
        .with_state(state)
}
