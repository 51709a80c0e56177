use axum::response::IntoResponse;
use http::StatusCode;

/// Liveness probe; bypasses the failure envelope
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
