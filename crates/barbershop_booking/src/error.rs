// --- File: crates/barbershop_booking/src/error.rs ---
use crate::status::TransitionError;
use barbershop_common::BarbershopError;
use barbershop_db::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// Slot taken, illegal transition or a concurrent modification
    #[error("{0}")]
    Conflict(String),
    #[error("Invalid status change: {0}")]
    Transition(#[from] TransitionError),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<BookingError> for BarbershopError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(msg) => BarbershopError::ValidationError(msg),
            BookingError::NotFound(msg) => BarbershopError::NotFoundError(msg),
            BookingError::Conflict(msg) => BarbershopError::ConflictError(msg),
            BookingError::Transition(e) => BarbershopError::ConflictError(e.to_string()),
            BookingError::Database(e) => e.into(),
        }
    }
}
