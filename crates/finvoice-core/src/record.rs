//! Invoice record model.
//!
//! A record is created once per successful extraction and lives for the
//! duration of the hosting process. After construction only `status` may
//! change; `extracted_data` is the system of record for what the remote
//! service said and is never touched again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};
use uuid::Uuid;

use crate::format::{format_currency, NA};
use crate::schema::Invoice;

/// Processing status of an invoice record.
///
/// The vocabulary is closed (unknown strings fail to parse), but transitions
/// between statuses are deliberately unconstrained.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
pub enum InvoiceStatus {
    Pending,
    Processing,
    Completed,
    Approved,
    Rejected,
    Failed,
}

/// A processed invoice with locally derived display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Short unique identifier, assigned at construction.
    pub id: String,
    /// Invoice number from the extracted data, or `"N/A"`.
    pub invoice_number: String,
    /// Seller name from the extracted data, or `"N/A"`.
    pub vendor_name: String,
    /// Currency-formatted total gross worth, or `"N/A"`.
    pub display_amount: String,
    /// Current processing status. The only mutable field.
    pub status: InvoiceStatus,
    /// When this record was processed locally (not the invoice issue date).
    pub created_at: DateTime<Utc>,
    /// Original uploaded filename, kept as an opaque string.
    pub source_filename: String,
    /// Full extraction result, retained verbatim.
    pub extracted_data: Invoice,
}

impl InvoiceRecord {
    /// Build a record from an extraction result.
    ///
    /// Derivation never fails on absent nested structure: a missing `seller`
    /// object and a missing `name` key both default the same way. The
    /// initial status is supplied by the caller, not inferred.
    pub fn build(extracted: Invoice, filename: impl Into<String>, status: InvoiceStatus) -> Self {
        let invoice_number = extracted
            .invoice_number
            .clone()
            .unwrap_or_else(|| NA.to_string());

        let vendor_name = extracted
            .seller
            .as_ref()
            .and_then(|seller| seller.name.clone())
            .unwrap_or_else(|| NA.to_string());

        let display_amount = format_currency(
            extracted
                .summary
                .as_ref()
                .and_then(|summary| summary.total_gross_worth.as_ref()),
        );

        Self {
            id: short_id(),
            invoice_number,
            vendor_name,
            display_amount,
            status,
            created_at: Utc::now(),
            source_filename: filename.into(),
            extracted_data: extracted,
        }
    }
}

/// First 8 hex chars of a v4 UUID. Unique within one process lifetime,
/// which is all the store guarantees.
fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Seller, Summary};
    use serde_json::json;
    use std::str::FromStr;

    fn sample_invoice() -> Invoice {
        Invoice {
            invoice_number: Some("INV-1".to_string()),
            seller: Some(Seller {
                name: Some("Acme".to_string()),
                ..Default::default()
            }),
            summary: Some(Summary {
                total_gross_worth: Some(json!(100)),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_derives_display_fields() {
        let record = InvoiceRecord::build(sample_invoice(), "scan.jpg", InvoiceStatus::Pending);
        assert_eq!(record.invoice_number, "INV-1");
        assert_eq!(record.vendor_name, "Acme");
        assert_eq!(record.display_amount, "$100.00");
        assert_eq!(record.status, InvoiceStatus::Pending);
        assert_eq!(record.source_filename, "scan.jpg");
        assert_eq!(record.id.len(), 8);
    }

    #[test]
    fn test_build_from_empty_nesting_never_fails() {
        let invoice = Invoice {
            seller: Some(Seller::default()),
            summary: Some(Summary::default()),
            ..Default::default()
        };
        let record = InvoiceRecord::build(invoice, "scan.jpg", InvoiceStatus::Completed);
        assert_eq!(record.vendor_name, "N/A");
        assert_eq!(record.display_amount, "N/A");
        assert_eq!(record.invoice_number, "N/A");
    }

    #[test]
    fn test_build_from_missing_nesting_never_fails() {
        let record = InvoiceRecord::build(Invoice::default(), "scan.jpg", InvoiceStatus::Pending);
        assert_eq!(record.vendor_name, "N/A");
        assert_eq!(record.display_amount, "N/A");
    }

    #[test]
    fn test_extracted_data_retained_verbatim() {
        let record = InvoiceRecord::build(sample_invoice(), "scan.jpg", InvoiceStatus::Pending);
        assert_eq!(
            record.extracted_data.seller.as_ref().unwrap().name.as_deref(),
            Some("Acme")
        );
    }

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in [
            InvoiceStatus::Pending,
            InvoiceStatus::Processing,
            InvoiceStatus::Completed,
            InvoiceStatus::Approved,
            InvoiceStatus::Rejected,
            InvoiceStatus::Failed,
        ] {
            let parsed = InvoiceStatus::from_str(&status.to_string()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_unknown_status_fails_to_parse() {
        assert!(InvoiceStatus::from_str("Reimbursed").is_err());
        assert!(InvoiceStatus::from_str("pending").is_err());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = InvoiceRecord::build(Invoice::default(), "a.jpg", InvoiceStatus::Pending);
        let b = InvoiceRecord::build(Invoice::default(), "b.jpg", InvoiceStatus::Pending);
        assert_ne!(a.id, b.id);
    }
}
