//! finvoice-core - Core library for finvoice.
//!
//! This crate provides the invoice schema types, the record lifecycle
//! (builder + store), the presentation/formatting layer, and the trait seam
//! to the hosted extraction service.
//!
//! # Example
//!
//! ```
//! use finvoice_core::{Invoice, InvoiceRecord, InvoiceStatus, RecordStore};
//!
//! let extracted: Invoice = serde_json::from_str(
//!     r#"{"invoice_number": "INV-1", "seller": {"name": "Acme"}}"#,
//! ).unwrap();
//!
//! let mut store = RecordStore::new();
//! let record = InvoiceRecord::build(extracted, "scan.jpg", InvoiceStatus::Pending);
//! let id = record.id.clone();
//! store.insert(record);
//!
//! assert_eq!(store.get(&id).unwrap().vendor_name, "Acme");
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod record;
pub mod schema;
pub mod store;
pub mod traits;

// Re-export commonly used types
pub use config::ExtractConfig;
pub use error::{FinvoiceError, FinvoiceResult};
pub use format::{format_currency, line_item_rows, status_style, vat_summary_rows, StatusStyle};
pub use record::{InvoiceRecord, InvoiceStatus};
pub use schema::{ClientInfo, Invoice, LineItem, Seller, Summary, VatSummaryEntry};
pub use store::RecordStore;
pub use traits::ExtractionAgent;
