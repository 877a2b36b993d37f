//! Test harness with local stub servers for end-to-end tests.
//!
//! A stub restaurant site and a stub Gemini endpoint are bound to ephemeral
//! ports; the real HTTP fetcher and Gemini client are pointed at them.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header::USER_AGENT, HeaderMap, Request, StatusCode},
    middleware::{self, Next},
    response::{Html, Response},
    routing::{get, post},
    Json, Router,
};
use menu_scraper::{kernel::ServerDeps, server::build_app, Config};
use serde_json::{json, Value};
use test_context::AsyncTestContext;
use tower::ServiceExt;

use super::fixtures;

pub const STUB_API_KEY: &str = "stub-key";
pub const FETCH_TIMEOUT: Duration = Duration::from_millis(500);
pub const SLOW_PAGE_DELAY: Duration = Duration::from_secs(3);

/// One request seen by the Gemini stub.
#[derive(Debug, Clone)]
pub struct RecordedModelCall {
    pub path: String,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
struct GeminiStub {
    calls: Arc<Mutex<Vec<RecordedModelCall>>>,
}

/// Answers by looking for known page markers in the user prompt.
async fn generate_content(
    State(stub): State<GeminiStub>,
    Path(path): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    stub.calls.lock().unwrap().push(RecordedModelCall {
        path,
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let text = if prompt.contains("broken-page") {
        "I could not find a menu on this page.".to_string()
    } else if prompt.contains("Blue Door Bistro") {
        format!("```json\n{}\n```", fixtures::simple_menu("Blue Door Bistro"))
    } else if prompt.contains("Luigi") {
        fixtures::flat_menu(
            "Luigi's Trattoria",
            &[
                ("Dinner", "Pasta", "Carbonara", 16.0),
                ("Lunch", "Salads", "Caesar", 9.5),
                ("Dinner", "Pasta", "Cacio e Pepe", 15.0),
            ],
        )
        .to_string()
    } else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": { "code": 500, "message": "stub has no answer", "status": "INTERNAL" }
            })),
        );
    };

    (StatusCode::OK, Json(fixtures::gemini_envelope(&text)))
}

/// User agents seen by the stub site, in arrival order.
#[derive(Clone, Default)]
struct SiteLog {
    user_agents: Arc<Mutex<Vec<String>>>,
}

async fn record_user_agent(
    State(log): State<SiteLog>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    let agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    log.user_agents.lock().unwrap().push(agent);
    next.run(request).await
}

fn site_router(log: SiteLog) -> Router {
    Router::new()
        .route("/luigis", get(|| async { Html(fixtures::page("Luigi's Trattoria")) }))
        .route(
            "/structured",
            get(|| async { Html(fixtures::ld_json_page("Blue Door Bistro")) }),
        )
        .route("/broken", get(|| async { Html(fixtures::page("broken-page")) }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(SLOW_PAGE_DELAY).await;
                Html(fixtures::page("too late"))
            }),
        )
        .route("/gone", get(|| async { StatusCode::GONE }))
        .layer(middleware::from_fn_with_state(log, record_user_agent))
}

async fn serve(router: Router) -> Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("Failed to bind stub server")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(addr)
}

/// Send a request through the router and decode the JSON body (`Null` if empty).
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub struct TestHarness {
    pub app: Router,
    site: SocketAddr,
    site_log: SiteLog,
    gemini: GeminiStub,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Stub servers stop with the test runtime
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let site_log = SiteLog::default();
        let site = serve(site_router(site_log.clone())).await?;

        let gemini = GeminiStub::default();
        let gemini_addr = serve(
            Router::new()
                .route("/models/*path", post(generate_content))
                .with_state(gemini.clone()),
        )
        .await?;

        let config = Config {
            gemini_api_key: Some(STUB_API_KEY.to_string()),
            gemini_base_url: format!("http://{}", gemini_addr),
            log_level_raw: Some("debug".to_string()),
            fetch_timeout: FETCH_TIMEOUT,
            ..Config::default()
        };
        let deps = ServerDeps::from_config(config).context("Failed to build server deps")?;

        Ok(Self {
            app: build_app(deps),
            site,
            site_log,
            gemini,
        })
    }

    pub fn site_url(&self, path: &str) -> String {
        format!("http://{}{}", self.site, path)
    }

    pub fn site_user_agents(&self) -> Vec<String> {
        self.site_log.user_agents.lock().unwrap().clone()
    }

    pub fn model_calls(&self) -> Vec<RecordedModelCall> {
        self.gemini.calls.lock().unwrap().clone()
    }

    /// `POST /` with the given URLs.
    pub async fn scrape(&self, urls: &[String]) -> (StatusCode, Value) {
        send(self.app.clone(), post_json("/", &json!({ "urls": urls }))).await
    }
}
