//! finvoice-server - REST API server for finvoice.
//!
//! This crate exposes the invoice extraction gateway over HTTP: upload an
//! invoice image, have the hosted service extract it, and query or update
//! the resulting records.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use finvoice_server::{create_server, AppState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let agent = Arc::new(/* ExtractionAgent impl */);
//!     let state = AppState::new(agent);
//!     let app = create_server(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
