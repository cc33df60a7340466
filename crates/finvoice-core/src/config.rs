//! Configuration for the hosted extraction service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FinvoiceError, FinvoiceResult};

/// Default base URL of the hosted extraction service.
pub const DEFAULT_BASE_URL: &str = "https://api.cloud.llamaindex.ai";

/// Default name of the registered extraction agent.
pub const DEFAULT_AGENT_NAME: &str = "invoice_extraction_agent";

/// Placeholder values from the sample .env that must be rejected as unset.
const PLACEHOLDERS: &[&str] = &[
    "your-api-key-here",
    "your-project-id-here",
    "your-organization-id-here",
    "your-agent-name-here",
];

/// Connection configuration for the extraction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// API key for the hosted service.
    pub api_key: String,
    /// Project identifier.
    pub project_id: String,
    /// Organization identifier.
    pub organization_id: String,
    /// Name of the registered extraction agent.
    pub agent_name: String,
    /// Base URL of the service.
    pub base_url: String,
    /// Seconds between extraction job status polls.
    pub check_interval_secs: u64,
}

impl ExtractConfig {
    /// Load configuration from the environment.
    ///
    /// Fails with [`FinvoiceError::Configuration`] if any credential is
    /// missing or still carries a sample placeholder value, so the problem
    /// is reported before any remote call is attempted.
    pub fn from_env() -> FinvoiceResult<Self> {
        let api_key = required_var("LLAMA_CLOUD_API_KEY")?;
        let project_id = required_var("LLAMA_CLOUD_PROJECT_ID")?;
        let organization_id = required_var("LLAMA_CLOUD_ORGANIZATION_ID")?;

        let agent_name = std::env::var("LLAMA_CLOUD_AGENT_NAME")
            .ok()
            .filter(|v| !v.is_empty() && !PLACEHOLDERS.contains(&v.as_str()))
            .unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string());

        let base_url = std::env::var("LLAMA_CLOUD_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let check_interval_secs = std::env::var("FINVOICE_CHECK_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            api_key,
            project_id,
            organization_id,
            agent_name,
            base_url,
            check_interval_secs,
        })
    }

    /// Polling interval as a [`Duration`].
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }
}

fn required_var(name: &str) -> FinvoiceResult<String> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() && !PLACEHOLDERS.contains(&v.as_str()) => Ok(v),
        _ => Err(FinvoiceError::configuration(format!(
            "{} is not configured. Set it in your environment or .env file.",
            name
        ))),
    }
}
