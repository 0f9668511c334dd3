// --- File: crates/barbershop_config/src/lib.rs ---
use config::{Config, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

pub mod models;
pub use models::*;

/// Marker value that is swapped for an environment variable at load time.
pub const SECRET_MARKER: &str = "secret_from_env";

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "BARBERSHOP";

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Failed to apply secret overrides: {0}")]
    Secrets(#[from] serde_json::Error),
}

/// Loads the layered configuration.
///
/// Sources, later ones win:
/// 1. `{CONFIG_DIR}/default.(toml|json|yaml)`
/// 2. `{CONFIG_DIR}/{RUN_ENV}.(toml|json|yaml)`
/// 3. environment variables `{PREFIX}__SECTION__KEY`
///
/// `CONFIG_DIR` defaults to `config`, `RUN_ENV` to `debug` and `PREFIX` to `BARBERSHOP`.
pub fn load_config() -> Result<AppConfig, ConfigLoadError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string());
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    debug!(
        "Loading config from {} and {} (env prefix {})",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("admin.admin_emails"),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all "secret_from_env" string values with environment variable values
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let env_key = path.join("_").to_uppercase();
                match std::env::var(&env_key) {
                    Ok(env_val) => *obj = Value::String(env_val),
                    Err(_) => {
                        warn!("env var {} not found for {}", env_key, SECRET_MARKER);
                        *obj = Value::Null;
                    }
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config.
///
/// A marker whose variable is missing becomes `null`, so an optional secret reads as unset.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigLoadError> {
    let mut json = serde_json::to_value(&config)?;
    inject_env_secrets(&mut json);
    Ok(serde_json::from_value(json)?)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables, once per process.
///
/// The file is `DOTENV_OVERRIDE` if set, else the first CLI argument when it starts
/// with `.env`, else `.env`. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = std::env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_marker_is_replaced_from_env() {
        std::env::set_var("ADMIN_SHARED_SECRET", "s3cret");
        let mut config = AppConfig::default();
        config.admin.shared_secret = Some(SECRET_MARKER.to_string());

        let config = apply_env_overrides_from_marker(config).unwrap();
        assert_eq!(config.admin.shared_secret.as_deref(), Some("s3cret"));
        std::env::remove_var("ADMIN_SHARED_SECRET");
    }

    #[test]
    fn test_missing_secret_becomes_none() {
        let mut config = AppConfig::default();
        config.shop.phone = Some(SECRET_MARKER.to_string());

        let config = apply_env_overrides_from_marker(config).unwrap();
        assert!(config.shop.phone.is_none());
    }

    #[test]
    fn test_sections_default_when_missing() {
        let json = r#"{ "server": { "host": "0.0.0.0", "port": 9000 } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert!(config.use_booking && config.use_admin && config.use_messaging);
        assert_eq!(config.booking.slot_interval_minutes, 30);
        assert_eq!(config.messaging.whatsapp_base_url, "https://wa.me");
        assert_eq!(config.database.max_connections, 5);
    }
}
