// --- File: crates/barbershop_admin/src/lib.rs ---

pub mod auth; // Shared-secret middleware for /admin routes
pub mod error;
pub mod handlers; // Axum handlers for the admin API
pub mod logic; // Admin operations over the repositories
pub mod routes;
pub mod validation;
#[cfg(test)]
mod validation_test;
#[cfg(feature = "openapi")]
pub mod doc;

pub use auth::{admin_auth_middleware, AdminActor, AdminAuthState, ADMIN_AUTH_HEADER};
pub use error::AdminError;
pub use logic::AdminService;
pub use routes::routes;
