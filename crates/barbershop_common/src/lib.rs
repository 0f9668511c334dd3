// --- File: crates/barbershop_common/src/lib.rs ---

pub mod error; // Error handling
pub mod events; // Realtime change feed
pub mod features; // Feature flag handling
pub mod http; // HTTP error mapping
pub mod logging; // Logging utilities
pub mod models; // Shared domain types

// Re-export error types and utilities for easier access
pub use error::{
    config_error, conflict, internal_error, not_found, validation_error, BarbershopError,
    Context, HttpStatusCode,
};

pub use http::{handle_json_result, map_json_error, IntoHttpResponse};

pub use events::{ChangeAction, ChangeEvent, ChangeFeed};

pub use features::{
    has_admin_secret, is_admin_enabled, is_booking_enabled, is_feature_enabled,
    is_messaging_enabled,
};
