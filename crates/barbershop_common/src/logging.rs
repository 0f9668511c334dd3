//! Logging utilities for the barbershop backend.
//!
//! All crates log through `tracing`; the binary calls [`init`] once at startup.

use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO.
///
/// ```
/// barbershop_common::logging::init();
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific level for the barbershop crates.
///
/// `RUST_LOG` still applies on top, so `RUST_LOG=sqlx=warn` keeps working.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    for target in [
        "barbershop_backend",
        "barbershop_booking",
        "barbershop_admin",
        "barbershop_messaging",
        "barbershop_db",
        "barbershop_common",
        "barbershop_config",
    ] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    // try_init: tests and the binary may both attempt to install a subscriber
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result, so it can be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}
