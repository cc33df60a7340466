//! Error types for finvoice operations.
//!
//! Expected absence (a record lookup missing) and remote failure (the
//! extraction service erroring) are distinct variants so callers can tell
//! "nothing to show" apart from "something broke".

use thiserror::Error;

/// Result type alias for finvoice operations.
pub type FinvoiceResult<T> = Result<T, FinvoiceError>;

/// Main error type for all finvoice operations.
#[derive(Error, Debug)]
pub enum FinvoiceError {
    /// Missing or placeholder credentials, detected before any remote call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The remote extraction call failed or returned no usable data.
    #[error("Extraction error: {message}")]
    Extraction {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Lookup by id against the record store missed.
    #[error("Invoice not found: {message}")]
    NotFound {
        message: String,
        invoice_id: Option<String>,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FinvoiceError {
    /// Create an extraction error.
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
            source: None,
        }
    }

    /// Create an extraction error wrapping an underlying cause.
    pub fn extraction_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Extraction {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not found error for an invoice id.
    pub fn not_found(invoice_id: impl Into<String>) -> Self {
        let id = invoice_id.into();
        Self::NotFound {
            message: format!("Invoice with id '{}' not found", id),
            invoice_id: Some(id),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
