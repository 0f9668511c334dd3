// --- File: crates/barbershop_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all barbershop crates.
///
/// Each crate keeps its own error enum and implements `From<CrateError> for BarbershopError`,
/// so handlers can return one type and get a consistent HTTP mapping.
#[derive(Error, Debug)]
pub enum BarbershopError {
    /// Input failed validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Request conflicts with current state (slot taken, illegal status change, ...)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Missing or invalid credentials
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Data could not be parsed
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BarbershopError {
    fn status_code(&self) -> u16 {
        match self {
            BarbershopError::ValidationError(_) => 400,
            BarbershopError::NotFoundError(_) => 404,
            BarbershopError::ConflictError(_) => 409,
            BarbershopError::AuthError(_) => 401,
            BarbershopError::ConfigError(_) => 500,
            BarbershopError::DatabaseError(_) => 500,
            BarbershopError::ParseError(_) => 400,
            BarbershopError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, BarbershopError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, BarbershopError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, BarbershopError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| BarbershopError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, BarbershopError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| BarbershopError::InternalError(format!("{}: {}", f(), error)))
    }
}

impl From<serde_json::Error> for BarbershopError {
    fn from(err: serde_json::Error) -> Self {
        BarbershopError::ParseError(err.to_string())
    }
}

impl From<chrono::ParseError> for BarbershopError {
    fn from(err: chrono::ParseError) -> Self {
        BarbershopError::ParseError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> BarbershopError {
    BarbershopError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> BarbershopError {
    BarbershopError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> BarbershopError {
    BarbershopError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> BarbershopError {
    BarbershopError::ConflictError(message.to_string())
}

pub fn internal_error<T: fmt::Display>(message: T) -> BarbershopError {
    BarbershopError::InternalError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(validation_error("x").status_code(), 400);
        assert_eq!(not_found("x").status_code(), 404);
        assert_eq!(conflict("x").status_code(), 409);
        assert_eq!(BarbershopError::AuthError("x".into()).status_code(), 401);
        assert_eq!(config_error("x").status_code(), 500);
    }

    #[test]
    fn test_context_wraps_as_internal() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        let err = result.context("writing file").unwrap_err();
        assert_eq!(err.to_string(), "Internal error: writing file: disk");
    }
}
