// --- File: crates/services/barbershop_backend/src/app.rs ---

use crate::app_state::AppState;
use crate::realtime::realtime_handler;
use axum::{extract::State, response::Json, routing::get, Router};
use barbershop_booking::BookingService;
use barbershop_common::{is_booking_enabled, BarbershopError};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

async fn health(State(state): State<Arc<AppState>>) -> Result<Json<Value>, BarbershopError> {
    if !state.repos.client.is_healthy().await {
        return Err(BarbershopError::DatabaseError(
            "database is not reachable".to_string(),
        ));
    }
    Ok(Json(json!({ "status": "ok", "shop": state.config.shop.name })))
}

/// Every enabled feature router, nested under `/api`.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();
    let booking = BookingService::new(config.clone(), state.repos.clone(), state.feed.clone());

    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut api = Router::new()
        .route("/", get(|| async { "Welcome to the Barbershop API!" }))
        .route("/health", get(health))
        .route("/realtime", get(realtime_handler))
        .with_state(Arc::new(state));

    if is_booking_enabled(&config) {
        info!("💡 Booking: adding catalogue, availability and appointment routes");
        api = api.merge(barbershop_booking::routes::routes(booking.clone()));
    }

    #[cfg(feature = "admin")]
    {
        if barbershop_common::is_admin_enabled(&config) {
            if !barbershop_common::has_admin_secret(&config) {
                tracing::warn!("admin.shared_secret is not set; /admin requests fail with 500");
            }
            api = api.merge(barbershop_admin::routes(
                barbershop_admin::AdminService::new(booking.clone()),
            ));
        } else {
            info!("Admin routes disabled (use_admin=false)");
        }
    }

    #[cfg(feature = "messaging")]
    {
        if barbershop_common::is_messaging_enabled(&config) {
            info!("💡 Messaging: adding WhatsApp and calendar link routes");
            api = api.merge(barbershop_messaging::routes(
                barbershop_messaging::MessagingService::new(booking.clone()),
            ));
        }
    }

    let mut app = Router::new().nest("/api", api);

    #[cfg(feature = "openapi")]
    {
        app = app.merge(swagger_ui());
    }

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(feature = "openapi")]
fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    use barbershop_booking::doc::BookingApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Barbershop API",
            version = "0.1.0",
            description = "Booking, administration and messaging API for a barbershop",
            license(name = "MIT", url = "https://opensource.org/licenses/MIT")
        ),
        components(schemas(barbershop_common::ChangeEvent, barbershop_common::ChangeAction)),
        tags((name = "Barbershop", description = "Core service endpoints")),
        servers((url = "/api", description = "Main API Prefix")),
    )]
    struct ApiDoc;

    let mut openapi_doc = ApiDoc::openapi();
    openapi_doc.merge(BookingApiDoc::openapi());
    #[cfg(feature = "admin")]
    openapi_doc.merge(barbershop_admin::doc::AdminApiDoc::openapi());
    #[cfg(feature = "messaging")]
    openapi_doc.merge(barbershop_messaging::doc::MessagingApiDoc::openapi());
    info!("📖 Adding Swagger UI at /api/docs");

    SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc)
}
