// File: services/barbershop_backend/src/main.rs
use barbershop_backend::{build_router, AppState};
use barbershop_common::logging;
use barbershop_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load config: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::connect(config.clone()).await.map_err(|e| {
        error!("Database setup failed: {}", e);
        e
    })?;
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
