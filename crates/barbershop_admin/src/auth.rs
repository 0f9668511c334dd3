// --- File: crates/barbershop_admin/src/auth.rs ---

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use barbershop_common::BarbershopError;
use barbershop_config::AppConfig;
use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub const ADMIN_AUTH_HEADER: &str = "X-Admin-Secret";
/// Optional; names the admin in audit fields such as `decided_by`.
pub const ADMIN_EMAIL_HEADER: &str = "X-Admin-Email";
pub const DEFAULT_ACTOR: &str = "admin";

#[derive(Clone)]
pub struct AdminAuthState {
    pub config: Arc<AppConfig>,
}

/// Who performed an admin request. Inserted into request extensions by the middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminActor(pub String);

fn header_str<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Checks `X-Admin-Secret` against the configured shared secret in constant time.
///
/// When `admin.admin_emails` is non-empty, a supplied `X-Admin-Email` must be one of them.
pub async fn admin_auth_middleware(
    State(auth_state): State<Arc<AdminAuthState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let expected = match auth_state
        .config
        .admin
        .shared_secret
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        Some(secret) => secret,
        None => {
            error!("Admin shared secret is not configured");
            return BarbershopError::ConfigError("admin authentication is not configured".into())
                .into_response();
        }
    };

    let Some(provided) = header_str(&req, ADMIN_AUTH_HEADER) else {
        warn!("Admin request without {} header", ADMIN_AUTH_HEADER);
        return BarbershopError::AuthError(format!("missing {} header", ADMIN_AUTH_HEADER))
            .into_response();
    };
    if !constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        warn!("Admin request with an invalid secret");
        return BarbershopError::AuthError("invalid credentials".into()).into_response();
    }

    let actor = match header_str(&req, ADMIN_EMAIL_HEADER).map(|e| e.trim().to_lowercase()) {
        Some(email) if !email.is_empty() => {
            let allowed = &auth_state.config.admin.admin_emails;
            if !allowed.is_empty() && !allowed.iter().any(|a| a.eq_ignore_ascii_case(&email)) {
                warn!("Admin request from unlisted email {}", email);
                return BarbershopError::AuthError("email is not an admin".into()).into_response();
            }
            email
        }
        _ => DEFAULT_ACTOR.to_string(),
    };

    debug!("Admin request authenticated as {}", actor);
    req.extensions_mut().insert(AdminActor(actor));
    next.run(req).await
}
