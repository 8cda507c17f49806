//! # gridwatchd: gridwatch daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`gridwatch.toml`, env vars)
//! - Install the `tracing` subscriber
//! - Construct the HTTP data source and the dashboard render target
//! - Start the refresh controller with the dashboard renderer as callbacks
//! - Build the axum router over the render target and refresh state
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT), then stop polling
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gridwatch_adapter_dashboard::{Dashboard, DashboardHandle, DashboardRenderer};
use gridwatch_adapter_http_axum::router;
use gridwatch_adapter_http_axum::state::AppState;
use gridwatch_adapter_http_reqwest::HttpDatasetSource;
use gridwatch_app::refresh_controller::RefreshController;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Data source
    let source = HttpDatasetSource::new(&config.source)?;

    // Render target, shared by the renderer (writer) and HTTP (reader)
    let dashboard = DashboardHandle::new(Dashboard::new(&config.fields, &config.dashboard));
    let renderer = DashboardRenderer::new(
        dashboard.clone(),
        config.fields.clone(),
        config.dashboard.clone(),
    );

    // Polling
    let controller = RefreshController::new(config.refresh_config());
    let refresh = controller.start(source, renderer);

    // HTTP
    let state = AppState::new(dashboard, refresh.subscribe())
        .with_page_refresh(config.server.page_refresh_secs);
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        addr = %bind_addr,
        source = %config.source.url,
        "gridwatchd listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down");
    refresh.join().await?;

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
