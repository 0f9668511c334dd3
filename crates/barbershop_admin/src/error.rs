// --- File: crates/barbershop_admin/src/error.rs ---
use barbershop_booking::BookingError;
use barbershop_common::BarbershopError;
use barbershop_db::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// Decision already taken the other way, or a state the request cannot apply to
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<AdminError> for BarbershopError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::Validation(msg) => BarbershopError::ValidationError(msg),
            AdminError::NotFound(msg) => BarbershopError::NotFoundError(msg),
            AdminError::Conflict(msg) => BarbershopError::ConflictError(msg),
            AdminError::Booking(e) => e.into(),
            AdminError::Database(e) => e.into(),
        }
    }
}
