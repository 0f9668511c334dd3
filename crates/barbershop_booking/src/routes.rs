// --- File: crates/barbershop_booking/src/routes.rs ---

use crate::handlers::{
    cancel_appointment_handler, create_appointment_handler, get_appointment_handler,
    get_availability_handler, list_barbers_handler, list_services_handler, BookingState,
};
use crate::service::BookingService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Public booking routes, relative to `/api`.
pub fn routes(service: BookingService) -> Router {
    let state = Arc::new(BookingState {
        config: service.config().clone(),
        service,
    });

    Router::new()
        .route("/services", get(list_services_handler))
        .route("/barbers", get(list_barbers_handler))
        .route("/availability", get(get_availability_handler))
        .route("/appointments", post(create_appointment_handler))
        .route("/appointments/{id}", get(get_appointment_handler))
        .route("/appointments/{id}/cancel", post(cancel_appointment_handler))
        .with_state(state)
}
