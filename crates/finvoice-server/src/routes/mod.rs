//! Route definitions for the REST API.

mod extract;
mod health;
mod invoices;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness and health
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        // Extraction
        .route("/extract-invoice", post(extract::extract_invoice))
        // Invoice records
        .route("/invoices", get(invoices::list_invoices))
        .route("/invoices/:id", get(invoices::get_invoice))
        .route("/invoices/:id/status", put(invoices::update_invoice_status))
        // Attach state
        .with_state(state)
}

pub use extract::*;
pub use health::*;
pub use invoices::*;
