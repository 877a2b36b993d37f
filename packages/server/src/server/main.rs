// Main entry point for the menu scraper server

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use menu_scraper::{kernel::ServerDeps, server::build_app, Config};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    info!("Starting menu scraper");
    for issue in config.readiness_issues() {
        warn!(setting = %issue.setting, problem = %issue.problem, "Configuration issue");
    }
    info!(
        model = %config.gemini_model,
        log_level = %config.log_level,
        max_concurrent_scrapes = config.max_concurrent_scrapes,
        "Configuration loaded"
    );

    let port = config.port;
    let grace = config.shutdown_grace;

    // Build application
    let deps = ServerDeps::from_config(config).context("Failed to build server dependencies")?;
    let app = build_app(deps);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on {}", addr);
    info!("Health check: http://localhost:{}/health", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(grace))
    .await
    .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on the first SIGINT/SIGTERM and arms the forced-exit timer.
async fn shutdown_signal(grace: Duration) {
    wait_for_signal().await;
    info!(
        grace_secs = grace.as_secs(),
        "Shutdown signal received, draining in-flight requests"
    );

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        error!("Requests still in flight after grace period, forcing exit");
        std::process::exit(1);
    });
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
