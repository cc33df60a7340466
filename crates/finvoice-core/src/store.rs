//! In-memory invoice record store.
//!
//! Process-lifetime only: records are never deleted and nothing persists
//! across restarts. The store itself is not synchronized; the server wraps
//! it in a lock and passes it into handlers explicitly.

use tracing::debug;

use crate::error::{FinvoiceError, FinvoiceResult};
use crate::record::{InvoiceRecord, InvoiceStatus};

/// Ordered collection of processed invoices, newest first.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<InvoiceRecord>,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record at the front (newest-first ordering).
    pub fn insert(&mut self, record: InvoiceRecord) {
        self.records.insert(0, record);
    }

    /// All records, newest first.
    pub fn list(&self) -> &[InvoiceRecord] {
        &self.records
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&InvoiceRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Update the status of a record, returning the updated record.
    ///
    /// A miss leaves the store untouched and fails with
    /// [`FinvoiceError::NotFound`].
    pub fn set_status(
        &mut self,
        id: &str,
        status: InvoiceStatus,
    ) -> FinvoiceResult<InvoiceRecord> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| FinvoiceError::not_found(id))?;

        record.status = status;
        debug!(id = %id, status = %status, "invoice status updated");
        Ok(record.clone())
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
