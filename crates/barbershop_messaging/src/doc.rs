// File: crates/barbershop_messaging/src/doc.rs

use utoipa::OpenApi;

use crate::service::{CalendarLink, WhatsappLink};
use crate::templates::MessageKind;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::appointment_whatsapp_handler,
        crate::handlers::calendar_link_handler,
        crate::handlers::direct_whatsapp_handler
    ),
    components(schemas(WhatsappLink, CalendarLink, MessageKind)),
    tags(
        (name = "Messaging", description = "WhatsApp and Google Calendar deep links")
    ),
    servers(
        (url = "/api", description = "Barbershop API server")
    )
)]
pub struct MessagingApiDoc;
