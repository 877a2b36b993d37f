//! Batch orchestration.
//!
//! Each URL is an independent task. Tasks run concurrently (bounded by
//! `max_concurrent_scrapes`) and a failure, including a panic, only affects
//! its own result.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::{error, info};

use super::{reconcile, reduce_content, request_menu_extraction};
use crate::common::PipelineError;
use crate::domains::menus::models::{MenuResult, ScrapeResponse, ScrapeResult};
use crate::kernel::ServerDeps;

/// Reported when a unit of work dies without producing a result.
pub const INTERNAL_FAILURE_MESSAGE: &str = "internal error while scraping";

/// Fetch, reduce, extract and reconcile one URL.
pub async fn scrape_url(deps: &ServerDeps, url: &str) -> Result<MenuResult, PipelineError> {
    let start = Instant::now();
    info!(url = %url, "Scraping URL");

    let html = deps.fetcher.fetch(url).await?;
    info!(url = %url, html_len = html.len(), "Fetched page");

    let reduced = reduce_content(&html);
    info!(
        url = %url,
        content_kind = reduced.kind(),
        truncated = reduced.is_truncated(),
        "Reduced page content"
    );

    let raw = request_menu_extraction(deps.ai.as_ref(), &reduced, url).await?;
    let menu = reconcile(&raw)?;

    info!(
        url = %url,
        restaurant = %menu.restaurant_name,
        menus = menu.menus.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Menu data extracted"
    );
    Ok(menu)
}

/// Scrape every URL and return one result per URL, in request order.
pub async fn scrape_batch(deps: Arc<ServerDeps>, urls: Vec<String>) -> ScrapeResponse {
    let start = Instant::now();
    let semaphore = Arc::new(Semaphore::new(deps.config.max_concurrent_scrapes.max(1)));

    let handles: Vec<_> = urls
        .iter()
        .cloned()
        .map(|url| {
            let deps = deps.clone();
            let semaphore = semaphore.clone();
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                scrape_url(&deps, &url).await
            })
        })
        .collect();

    // Handles are awaited in input order, so completion order never leaks into the response
    let mut results = Vec::with_capacity(urls.len());
    for (url, handle) in urls.into_iter().zip(handles) {
        let result = match handle.await {
            Ok(Ok(menu)) => ScrapeResult::succeeded(url, menu),
            Ok(Err(e)) => {
                error!(url = %url, stage = e.stage(), error = %e, "Scraping failed");
                ScrapeResult::failed(url, e.to_string())
            }
            Err(e) => {
                error!(url = %url, error = %e, "Scrape task aborted");
                ScrapeResult::failed(url, INTERNAL_FAILURE_MESSAGE)
            }
        };
        results.push(result);
    }

    let succeeded = results.iter().filter(|r| r.success).count();
    info!(
        total = results.len(),
        succeeded,
        failed = results.len() - succeeded,
        duration_ms = start.elapsed().as_millis() as u64,
        "Batch complete"
    );

    ScrapeResponse { results }
}
