//! reqlog - Demo Server Entry Point
//!
//! Serves the demo routes with the request logger installed. Request lines go
//! to stdout (or syslog when `REQLOG_SYSLOG` is set); the server's own
//! diagnostics go to stderr.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reqlog::{config::CONFIG, handlers, middleware::RequestLogger, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting reqlog demo server...");

    let logger = RequestLogger::new(&CONFIG.logger);
    tracing::info!(mode = ?logger.mode(), "Request logger ready");

    // Create application state
    let state = AppState::new(logger, CONFIG.clone());

    let server = &state.config().server;
    let addr = SocketAddr::new(server.host.parse()?, server.port);

    // Build the router
    let app = handlers::routes(state);

    // Start the server
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
