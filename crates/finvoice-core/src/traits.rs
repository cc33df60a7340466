//! Extraction service trait.

use async_trait::async_trait;

use crate::error::FinvoiceResult;
use crate::schema::Invoice;

/// A remote agent that turns an invoice image into structured data.
///
/// Implementations perform exactly one remote call per invocation: no
/// retries, no backoff, no local schema validation. Any remote or transport
/// failure surfaces as [`crate::error::FinvoiceError::Extraction`].
#[async_trait]
pub trait ExtractionAgent: Send + Sync {
    /// Submit an image and return the extracted invoice.
    async fn extract(&self, image: &[u8], filename: &str) -> FinvoiceResult<Invoice>;

    /// Human-readable agent name, for logging.
    fn name(&self) -> &str;
}
