//! Server state management.

use std::sync::Arc;

use finvoice_core::store::RecordStore;
use finvoice_core::traits::ExtractionAgent;
use tokio::sync::RwLock;

/// Shared application state.
///
/// The record store is process-wide and shared by all requests, so mutation
/// goes through a single lock; the original's unguarded module-level list is
/// deliberately not reproduced.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<RecordStore>>,
    pub agent: Arc<dyn ExtractionAgent>,
}

impl AppState {
    /// Create application state around an extraction agent.
    pub fn new(agent: Arc<dyn ExtractionAgent>) -> Self {
        Self {
            store: Arc::new(RwLock::new(RecordStore::new())),
            agent,
        }
    }
}
