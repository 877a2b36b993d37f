use axum::{
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

/// Any unmatched route.
pub async fn not_found_handler(request: Request) -> Response {
    warn!(method = %request.method(), path = %request.uri().path(), "Route not found");
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": 404, "message": "Not Found" })),
    )
        .into_response()
}

pub async fn favicon_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}
