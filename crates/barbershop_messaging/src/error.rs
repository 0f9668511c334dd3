// --- File: crates/barbershop_messaging/src/error.rs ---
use barbershop_booking::BookingError;
use barbershop_common::BarbershopError;
use barbershop_db::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),
    #[error("{0}")]
    Validation(String),
    /// Stored appointment date/time does not map to an instant in the shop time zone
    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<MessagingError> for BarbershopError {
    fn from(err: MessagingError) -> Self {
        match err {
            MessagingError::InvalidPhone(_) | MessagingError::Validation(_) => {
                BarbershopError::ValidationError(err.to_string())
            }
            MessagingError::InvalidTime(msg) => BarbershopError::InternalError(msg),
            MessagingError::Booking(e) => e.into(),
            MessagingError::Database(e) => e.into(),
        }
    }
}
