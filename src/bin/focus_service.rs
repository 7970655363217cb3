//! Focus Service Binary
//!
//! Runs the focus kernel as a REST service with:
//! - Structured JSON logging (pretty format for development)
//! - A background change watcher publishing to the event stream
//! - Graceful shutdown handling
//!
//! ## Configuration
//!
//! Environment variables:
//! - `FOCUS_WORKSPACE_ROOT`: Root of the multi-project working tree (default: current directory)
//! - `FOCUS_POLL_INTERVAL_SECS`: Watcher poll interval (default: 5)
//! - `PORT`: Service port (default: 8650)
//! - `HOST`: Service host (default: 0.0.0.0)
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! FOCUS_WORKSPACE_ROOT=/path/to/workspace cargo run --bin focus_service --features service
//! ```

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use focus_kernel::service::{create_router, ServiceState};
use focus_kernel::{ChangeWatcher, GitStatusQuery, NotificationBus, Workspace};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "focus_service=info,focus_kernel=info,tower_http=info".into());

    if log_format == "pretty" {
        // Pretty format for local development
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_span_events(FmtSpan::CLOSE))
            .init();
    } else {
        // JSON format for production
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let version = env!("CARGO_PKG_VERSION");
    info!(version = version, "Starting Focus Service");

    // Load configuration from environment
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8650);

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

    let workspace = Workspace::from_env();
    info!(
        root = %workspace.root().display(),
        interval_secs = workspace.poll_interval().as_secs(),
        "Workspace configured"
    );

    // One bus shared by the watcher and the event route
    let bus = NotificationBus::new();
    let state = ServiceState::with_bus(workspace.clone(), bus.clone());

    // Background change watcher
    let query = GitStatusQuery::new(workspace.root());
    let watcher = ChangeWatcher::new(workspace, query, bus);
    let watcher_task = tokio::spawn(watcher.run());

    // Build router with middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!(address = %addr, version = version, "Focus Service listening");

    let listener = TcpListener::bind(addr).await?;

    // Graceful shutdown handling
    let shutdown_signal = async {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
            _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
        }
    };

    info!("Ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    // Shutdown stops the polling timer; subscriber connections close with
    // the server
    watcher_task.abort();

    info!("Focus Service shutdown complete");

    Ok(())
}
