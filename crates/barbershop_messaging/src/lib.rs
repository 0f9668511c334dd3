// --- File: crates/barbershop_messaging/src/lib.rs ---

pub mod error;
pub mod handlers;
pub mod links; // wa.me and Google Calendar URLs
pub mod phone;
pub mod routes;
pub mod service;
pub mod templates; // Message texts
#[cfg(feature = "openapi")]
pub mod doc;

pub use error::MessagingError;
pub use links::{google_calendar_link, whatsapp_link, CalendarTemplate};
pub use phone::normalize_phone;
pub use routes::routes;
pub use service::MessagingService;
pub use templates::{render_message, MessageKind};
