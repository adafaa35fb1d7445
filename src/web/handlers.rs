//! HTTP handlers for the readings endpoint.

use crate::error::ExporterError;
use crate::sensors::{Reading, SensorContext};
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{debug, error};

/// Methods advertised to browsers in the preflight response.
pub const ALLOWED_METHODS: &str = "GET, POST";
/// Request headers advertised to browsers in the preflight response.
pub const ALLOWED_HEADERS: &str = "content-type";

/// Error returned to clients when a reading cannot be taken.
pub struct ApiError(ExporterError);

impl From<ExporterError> for ApiError {
    fn from(err: ExporterError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Failed to assemble reading: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

/// Route every request by method alone; the path is ignored.
pub async fn dispatch(State(sensors): State<SensorContext>, method: Method) -> Response {
    match method {
        Method::GET => get_reading(sensors).await.into_response(),
        Method::OPTIONS => preflight().into_response(),
        other => not_implemented(other).into_response(),
    }
}

/// Take a fresh reading and return it as JSON.
pub async fn get_reading(sensors: SensorContext) -> Result<Json<Reading>, ApiError> {
    let reading = sensors.read().await?;
    Ok(Json(reading))
}

/// Answer a CORS preflight.
pub fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
        ],
    )
}

/// Reject every other method explicitly.
pub fn not_implemented(method: Method) -> impl IntoResponse {
    debug!("Rejecting unsupported method {}", method);
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(json!({ "error": format!("Unsupported method ({})", method) })),
    )
}
