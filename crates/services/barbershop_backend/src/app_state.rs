// --- File: crates/services/barbershop_backend/src/app_state.rs ---
use barbershop_common::ChangeFeed;
use barbershop_config::AppConfig;
use barbershop_db::{init_all_schemas, DbClient, DbError, Repositories};
use std::sync::Arc;
use tracing::info;

/// Shared handles built once at startup and cloned into each feature router.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repos: Repositories,
    pub feed: ChangeFeed,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, repos: Repositories) -> Self {
        let feed = ChangeFeed::new(config.realtime.channel_capacity);
        Self {
            config,
            repos,
            feed,
        }
    }

    /// Connect to the configured database and bootstrap every table.
    pub async fn connect(config: Arc<AppConfig>) -> Result<Self, DbError> {
        let client = DbClient::new(&config).await?;
        info!("Database ready: {}", client);
        let repos = Repositories::new(client);
        init_all_schemas(&repos).await?;
        Ok(Self::new(config, repos))
    }
}
