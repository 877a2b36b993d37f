use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

use crate::config::ConfigIssue;
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ConfigIssue>,
}

/// Liveness: the process is up and serving.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness check
///
/// Returns 200 when every required setting is present and valid, 500 with the
/// list of problems otherwise.
pub async fn ready_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<ReadyResponse>) {
    let issues = state.deps.config.readiness_issues();

    if issues.is_empty() {
        return (
            StatusCode::OK,
            Json(ReadyResponse {
                message: "Service is ready".to_string(),
                errors: Vec::new(),
            }),
        );
    }

    warn!(issues = issues.len(), "Readiness check failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ReadyResponse {
            message: "Missing config error".to_string(),
            errors: issues,
        }),
    )
}
