// --- File: crates/barbershop_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{BarbershopError, HttpStatusCode};

/// Extension trait for BarbershopError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for BarbershopError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "code": status_code.as_u16(),
            }
        }));

        (status_code, body).into_response()
    }
}

impl IntoResponse for BarbershopError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// Converts a Result<T, BarbershopError> to a Result<Json<T>, Response>.
pub fn handle_json_result<T>(result: Result<T, BarbershopError>) -> Result<Json<T>, Response>
where
    T: serde::Serialize,
{
    result.map(Json).map_err(|err| err.into_response())
}

/// Converts a Result<T, E> to a Result<Json<T>, Response> using a custom error mapper.
pub fn map_json_error<T, E, F>(result: Result<T, E>, f: F) -> Result<Json<T>, Response>
where
    T: serde::Serialize,
    F: FnOnce(E) -> BarbershopError,
{
    result.map(Json).map_err(|err| f(err).into_response())
}
