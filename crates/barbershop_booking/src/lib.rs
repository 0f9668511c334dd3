// --- File: crates/barbershop_booking/src/lib.rs ---
pub mod doc;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod service;
pub mod slots;
#[cfg(test)]
mod slots_proptest;
#[cfg(test)]
mod slots_test;
pub mod status;

pub use error::BookingError;
pub use service::{BookingRequest, BookingService};
