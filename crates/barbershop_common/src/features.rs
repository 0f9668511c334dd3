//! Runtime feature flags.
//!
//! Features are switched on in two places: Cargo features on the backend decide what
//! is compiled in, and the `use_*` flags in [`AppConfig`] decide what is mounted.

use barbershop_config::AppConfig;

/// Check if a feature is enabled at runtime: the flag is set and its configuration is usable.
pub fn is_feature_enabled(use_feature: bool, config_ready: bool) -> bool {
    use_feature && config_ready
}

/// Public catalogue, availability and booking routes.
pub fn is_booking_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_booking, config.booking.slot_interval_minutes > 0)
}

/// Access requests and the `/admin` tree. A missing shared secret does not unmount
/// them; the admin middleware answers 500 until one is configured.
pub fn is_admin_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_admin, true)
}

/// True when `admin.shared_secret` holds a usable value.
pub fn has_admin_secret(config: &AppConfig) -> bool {
    config
        .admin
        .shared_secret
        .as_deref()
        .is_some_and(|s| !s.trim().is_empty())
}

/// WhatsApp and calendar deep-link routes.
pub fn is_messaging_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(
        config.use_messaging,
        !config.messaging.whatsapp_base_url.is_empty(),
    )
}
