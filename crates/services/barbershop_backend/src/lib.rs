// --- File: crates/services/barbershop_backend/src/lib.rs ---

pub mod app; // Router assembly
pub mod app_state;
pub mod realtime; // SSE change feed

pub use app::build_router;
pub use app_state::AppState;
