// File: crates/barbershop_booking/src/handlers.rs
use crate::service::{AvailabilityResponse, BookingRequest, BookingService};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use barbershop_common::models::{Appointment, Barber, Service};
use barbershop_common::BarbershopError;
use barbershop_config::AppConfig;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

// Shared state needed by the booking handlers
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub service: BookingService,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    pub barber_id: String,
    /// Local date in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2030-05-06"))]
    pub date: String,
    /// Optional; the configured default duration applies without it
    pub service_id: Option<String>,
}

/// Active services, ordered by name.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/services",
    responses((status = 200, description = "Active services", body = Vec<Service>)),
    tag = "Booking"
))]
pub async fn list_services_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<Vec<Service>>, BarbershopError> {
    Ok(Json(state.service.list_services().await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/barbers",
    responses((status = 200, description = "Active barbers", body = Vec<Barber>)),
    tag = "Booking"
))]
pub async fn list_barbers_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<Vec<Barber>>, BarbershopError> {
    Ok(Json(state.service.list_barbers().await?))
}

/// Slots for one barber and day, including taken ones (`available = false`).
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Slots for the day", body = AvailabilityResponse),
        (status = 400, description = "Invalid date or inactive barber/service"),
        (status = 404, description = "Unknown barber or service")
    ),
    tag = "Booking"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, BarbershopError> {
    let response = state
        .service
        .get_availability(&query.barber_id, &query.date, query.service_id.as_deref())
        .await?;
    Ok(Json(response))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/appointments",
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Appointment created as pending", body = Appointment),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Unknown barber or service"),
        (status = 409, description = "Slot not available")
    ),
    tag = "Booking"
))]
pub async fn create_appointment_handler(
    State(state): State<Arc<BookingState>>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Appointment>), BarbershopError> {
    info!(
        "Booking request for barber {} on {} at {}",
        request.barber_id, request.date, request.time
    );
    let appointment = state.service.create_booking(request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment", body = Appointment),
        (status = 404, description = "Not found")
    ),
    tag = "Booking"
))]
pub async fn get_appointment_handler(
    State(state): State<Arc<BookingState>>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, BarbershopError> {
    Ok(Json(state.service.get_appointment(&id).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/appointments/{id}/cancel",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Cancelled appointment", body = Appointment),
        (status = 404, description = "Not found"),
        (status = 409, description = "Appointment can no longer be cancelled")
    ),
    tag = "Booking"
))]
pub async fn cancel_appointment_handler(
    State(state): State<Arc<BookingState>>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, BarbershopError> {
    info!("Client cancellation for appointment {}", id);
    Ok(Json(state.service.cancel_by_client(&id).await?))
}
