use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use tracing::{info, warn};

use crate::domains::menus::{scrape_batch, ScrapeRequest, ScrapeResponse};
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// `POST /` - scrape every URL in the body.
///
/// Always 200 once the body parses; per-URL failures are reported inside
/// `results`.
pub async fn scrape_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Rejected scrape request");
        ApiError::BadRequest(rejection.body_text())
    })?;

    info!(url_count = request.urls.len(), "Scrape request received");
    let response = scrape_batch(state.deps.clone(), request.urls).await;

    Ok(Json(response))
}
