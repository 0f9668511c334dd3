// File: crates/barbershop_messaging/src/handlers.rs
use crate::service::{CalendarLink, MessagingService, WhatsappLink};
use crate::templates::MessageKind;
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use barbershop_common::BarbershopError;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct MessagingState {
    pub service: MessagingService,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct WhatsappQuery {
    /// confirmation (default), reminder, cancellation or status_update
    pub kind: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct DirectWhatsappQuery {
    pub phone: String,
    pub message: String,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/appointments/{id}/whatsapp",
    params(("id" = String, Path, description = "Appointment id"), WhatsappQuery),
    responses(
        (status = 200, description = "wa.me link to the client with a pre-filled message", body = WhatsappLink),
        (status = 400, description = "Unknown kind or unusable client phone"),
        (status = 404, description = "Appointment not found")
    ),
    tag = "Messaging"
))]
pub async fn appointment_whatsapp_handler(
    State(state): State<Arc<MessagingState>>,
    Path(id): Path<String>,
    Query(query): Query<WhatsappQuery>,
) -> Result<Json<WhatsappLink>, BarbershopError> {
    let kind = match query.kind.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        Some(k) => k
            .parse::<MessageKind>()
            .map_err(|e| BarbershopError::ValidationError(e.to_string()))?,
        None => MessageKind::default(),
    };
    Ok(Json(state.service.appointment_whatsapp(&id, kind).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/appointments/{id}/calendar-link",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Google Calendar template link", body = CalendarLink),
        (status = 404, description = "Appointment not found")
    ),
    tag = "Messaging"
))]
pub async fn calendar_link_handler(
    State(state): State<Arc<MessagingState>>,
    Path(id): Path<String>,
) -> Result<Json<CalendarLink>, BarbershopError> {
    Ok(Json(state.service.appointment_calendar_link(&id).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/whatsapp",
    params(DirectWhatsappQuery),
    responses(
        (status = 200, description = "wa.me link", body = WhatsappLink),
        (status = 400, description = "Invalid phone or empty message")
    ),
    security(("admin_secret" = [])),
    tag = "Messaging"
))]
pub async fn direct_whatsapp_handler(
    State(state): State<Arc<MessagingState>>,
    Query(query): Query<DirectWhatsappQuery>,
) -> Result<Json<WhatsappLink>, BarbershopError> {
    Ok(Json(
        state.service.direct_whatsapp(&query.phone, &query.message)?,
    ))
}
