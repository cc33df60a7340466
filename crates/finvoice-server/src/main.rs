//! finvoice-server - REST API server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use finvoice_core::traits::ExtractionAgent;
use finvoice_core::ExtractConfig;
use finvoice_extract::LlamaExtractClient;
use finvoice_server::{create_server, AppState};
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("finvoice_server=debug".parse().unwrap()),
        )
        .init();

    // Credentials are validated before any remote call is attempted
    let config = ExtractConfig::from_env()?;

    // Resolve the registered extraction agent
    let client = LlamaExtractClient::new(config.clone());
    let agent = client.agent().await?;
    info!(agent = %agent.name(), "connected to extraction agent");

    let state = AppState::new(Arc::new(agent) as Arc<dyn ExtractionAgent>);
    let app = create_server(state);

    // Get bind address from environment
    let host = std::env::var("FINVOICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("FINVOICE_PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse()
        .expect("FINVOICE_PORT must be a valid port number");

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting finvoice-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped cleanly");
    Ok(())
}
