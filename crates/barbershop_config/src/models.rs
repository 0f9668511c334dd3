// --- File: crates/barbershop_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite://data/barbershop.db, loaded via BARBERSHOP__DATABASE__URL
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/barbershop.db".to_string(),
            max_connections: default_max_connections(),
        }
    }
}

// --- Shop Config ---
/// Static facts about the shop used in messages, links and "today" computations.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ShopConfig {
    pub name: String,
    /// IANA time zone, e.g. "Europe/Lisbon". All appointment dates/times are local to it.
    pub time_zone: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Digits only, no plus sign, e.g. "351".
    pub default_country_code: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            name: "Barbershop".to_string(),
            time_zone: "UTC".to_string(),
            address: None,
            phone: None,
            default_country_code: "1".to_string(),
        }
    }
}

// --- Booking Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingConfig {
    /// Step between candidate slot start times.
    pub slot_interval_minutes: i64,
    /// Minimum distance between "now" and a bookable slot on the current day.
    pub lead_time_minutes: i64,
    /// How far into the future bookings are accepted.
    pub max_days_ahead: i64,
    /// Used when availability is requested without a service.
    pub default_duration_minutes: i64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            slot_interval_minutes: 30,
            lead_time_minutes: 60,
            max_days_ahead: 60,
            default_duration_minutes: 30,
        }
    }
}

// --- Admin Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AdminConfig {
    pub shared_secret: Option<String>, // usually "secret_from_env" -> ADMIN_SHARED_SECRET
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

// --- Messaging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MessagingConfig {
    pub whatsapp_base_url: String,
    pub calendar_base_url: String,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            whatsapp_base_url: "https://wa.me".to_string(),
            calendar_base_url: "https://calendar.google.com/calendar/render".to_string(),
        }
    }
}

// --- Realtime Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RealtimeConfig {
    pub channel_capacity: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
        }
    }
}

fn enabled() -> bool {
    true
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to true) ---
    #[serde(default = "enabled")]
    pub use_booking: bool,
    #[serde(default = "enabled")]
    pub use_admin: bool,
    #[serde(default = "enabled")]
    pub use_messaging: bool,

    // --- Sections with sensible defaults ---
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub shop: ShopConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub messaging: MessagingConfig,
    #[serde(default)]
    pub realtime: RealtimeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            use_booking: true,
            use_admin: true,
            use_messaging: true,
            database: DatabaseConfig::default(),
            shop: ShopConfig::default(),
            booking: BookingConfig::default(),
            admin: AdminConfig::default(),
            messaging: MessagingConfig::default(),
            realtime: RealtimeConfig::default(),
        }
    }
}
