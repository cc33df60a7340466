//! finvoice-extract - Hosted extraction service client.
//!
//! Wraps the remote schema-guided extraction service behind the
//! [`finvoice_core::traits::ExtractionAgent`] seam. All intelligence lives on
//! the remote side; this crate only builds requests, polls jobs, and reshapes
//! responses.

mod client;

pub use client::{AgentInfo, ExtractAgentHandle, LlamaExtractClient};
