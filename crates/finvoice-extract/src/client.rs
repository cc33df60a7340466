//! Client for the hosted extraction service.
//!
//! One extraction is: stage the image to a scoped temp file, upload it,
//! create an extraction job against the registered agent, poll until the job
//! reaches a terminal status, fetch the result. No retries and no local
//! validation of the returned data; the service's contract is trusted.

use std::io::Write;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use finvoice_core::error::{FinvoiceError, FinvoiceResult};
use finvoice_core::schema::Invoice;
use finvoice_core::traits::ExtractionAgent;
use finvoice_core::ExtractConfig;

/// A registered extraction agent on the hosted service.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    id: String,
}

#[derive(Debug, Deserialize)]
struct JobInfo {
    id: String,
    status: String,
}

/// Client for agent management on the hosted extraction service.
pub struct LlamaExtractClient {
    client: Client,
    config: ExtractConfig,
}

impl LlamaExtractClient {
    /// Create a new client. The configuration is expected to have been
    /// validated already (see [`ExtractConfig::from_env`]).
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.config.base_url, path)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.config.api_key)
            .query(&[
                ("project_id", self.config.project_id.as_str()),
                ("organization_id", self.config.organization_id.as_str()),
            ])
    }

    /// Look up an agent by name. Returns `None` on a 404.
    pub async fn agent_by_name(&self, name: &str) -> FinvoiceResult<Option<AgentInfo>> {
        let url = self.api_url(&format!("/extraction/extraction-agents/by-name/{}", name));
        let response = self
            .authed(self.client.get(&url))
            .send()
            .await
            .map_err(|e| {
                FinvoiceError::extraction_with_source("Failed to look up extraction agent", e)
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let agent: AgentInfo = response.json().await.map_err(|e| {
                    FinvoiceError::extraction_with_source("Failed to parse agent response", e)
                })?;
                Ok(Some(agent))
            }
            _ => Err(service_error("Failed to look up extraction agent", response).await),
        }
    }

    /// Register a new agent with the given data schema.
    pub async fn create_agent(&self, name: &str, data_schema: Value) -> FinvoiceResult<AgentInfo> {
        let url = self.api_url("/extraction/extraction-agents");
        let body = json!({
            "name": name,
            "data_schema": data_schema,
        });

        let response = self
            .authed(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                FinvoiceError::extraction_with_source("Failed to create extraction agent", e)
            })?;

        if !response.status().is_success() {
            return Err(service_error("Failed to create extraction agent", response).await);
        }

        let agent: AgentInfo = response.json().await.map_err(|e| {
            FinvoiceError::extraction_with_source("Failed to parse agent response", e)
        })?;

        info!(agent_id = %agent.id, agent_name = %agent.name, "extraction agent created");
        Ok(agent)
    }

    /// Look up the agent by name, registering it with the invoice schema if
    /// it does not exist yet.
    pub async fn get_or_create_agent(&self, name: &str) -> FinvoiceResult<AgentInfo> {
        if let Some(agent) = self.agent_by_name(name).await? {
            debug!(agent_id = %agent.id, "extraction agent already registered");
            return Ok(agent);
        }
        self.create_agent(name, Invoice::data_schema()).await
    }

    /// Resolve the configured agent into an extraction handle.
    ///
    /// Fails if the agent has not been registered (run `finvoice setup`).
    pub async fn agent(&self) -> FinvoiceResult<ExtractAgentHandle> {
        let name = self.config.agent_name.clone();
        let agent = self.agent_by_name(&name).await?.ok_or_else(|| {
            FinvoiceError::extraction(format!("Extraction agent '{}' not found", name))
        })?;

        Ok(ExtractAgentHandle {
            client: self.client.clone(),
            config: self.config.clone(),
            agent,
        })
    }
}

/// Handle to a resolved extraction agent.
pub struct ExtractAgentHandle {
    client: Client,
    config: ExtractConfig,
    agent: AgentInfo,
}

impl ExtractAgentHandle {
    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.config.base_url, path)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.config.api_key)
            .query(&[
                ("project_id", self.config.project_id.as_str()),
                ("organization_id", self.config.organization_id.as_str()),
            ])
    }

    async fn upload_file(&self, path: &std::path::Path, filename: &str) -> FinvoiceResult<String> {
        let bytes = tokio::fs::read(path).await?;
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| FinvoiceError::extraction_with_source("Invalid upload part", e))?;
        let form = Form::new().part("upload_file", part);

        let response = self
            .authed(self.client.post(self.api_url("/files")))
            .multipart(form)
            .send()
            .await
            .map_err(|e| FinvoiceError::extraction_with_source("Failed to upload image", e))?;

        if !response.status().is_success() {
            return Err(service_error("Failed to upload image", response).await);
        }

        let file: FileInfo = response.json().await.map_err(|e| {
            FinvoiceError::extraction_with_source("Failed to parse file response", e)
        })?;
        Ok(file.id)
    }

    async fn create_job(&self, file_id: &str) -> FinvoiceResult<JobInfo> {
        let body = json!({
            "extraction_agent_id": self.agent.id,
            "file_id": file_id,
        });

        let response = self
            .authed(self.client.post(self.api_url("/extraction/jobs")))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                FinvoiceError::extraction_with_source("Failed to create extraction job", e)
            })?;

        if !response.status().is_success() {
            return Err(service_error("Failed to create extraction job", response).await);
        }

        response.json().await.map_err(|e| {
            FinvoiceError::extraction_with_source("Failed to parse job response", e)
        })
    }

    async fn wait_for_job(&self, job_id: &str) -> FinvoiceResult<()> {
        loop {
            let url = self.api_url(&format!("/extraction/jobs/{}", job_id));
            let response = self.authed(self.client.get(&url)).send().await.map_err(|e| {
                FinvoiceError::extraction_with_source("Failed to poll extraction job", e)
            })?;

            if !response.status().is_success() {
                return Err(service_error("Failed to poll extraction job", response).await);
            }

            let job: JobInfo = response.json().await.map_err(|e| {
                FinvoiceError::extraction_with_source("Failed to parse job response", e)
            })?;

            match job.status.as_str() {
                "SUCCESS" => return Ok(()),
                "ERROR" | "FAILED" => {
                    return Err(FinvoiceError::extraction(format!(
                        "Extraction job {} failed",
                        job.id
                    )))
                }
                other => {
                    debug!(job_id = %job.id, status = %other, "extraction job pending");
                    tokio::time::sleep(self.config.check_interval()).await;
                }
            }
        }
    }

    async fn fetch_result(&self, job_id: &str) -> FinvoiceResult<Invoice> {
        let url = self.api_url(&format!("/extraction/jobs/{}/result", job_id));
        let response = self.authed(self.client.get(&url)).send().await.map_err(|e| {
            FinvoiceError::extraction_with_source("Failed to fetch extraction result", e)
        })?;

        if !response.status().is_success() {
            return Err(service_error("Failed to fetch extraction result", response).await);
        }

        let result: Value = response.json().await.map_err(|e| {
            FinvoiceError::extraction_with_source("Failed to parse result response", e)
        })?;

        parse_result(result)
    }
}

#[async_trait]
impl ExtractionAgent for ExtractAgentHandle {
    async fn extract(&self, image: &[u8], filename: &str) -> FinvoiceResult<Invoice> {
        // The guard deletes the staged file on every exit path, including
        // errors below: no uploaded image bytes persist on disk.
        let staged = stage_image(image)?;

        let file_id = self.upload_file(staged.path(), filename).await?;
        let job = self.create_job(&file_id).await?;
        info!(job_id = %job.id, filename = %filename, "extraction job created");

        self.wait_for_job(&job.id).await?;
        self.fetch_result(&job.id).await
    }

    fn name(&self) -> &str {
        &self.agent.name
    }
}

/// Write uploaded image bytes to a scoped temporary file.
///
/// The returned guard removes the file when dropped.
pub(crate) fn stage_image(image: &[u8]) -> FinvoiceResult<NamedTempFile> {
    let mut staged = tempfile::Builder::new()
        .prefix("finvoice-upload-")
        .suffix(".jpg")
        .tempfile()?;
    staged.write_all(image)?;
    staged.flush()?;
    Ok(staged)
}

/// Extract the invoice payload from a job result document.
///
/// A response without a `data` attribute is a malformed result, reported the
/// same way as a remote failure.
pub(crate) fn parse_result(result: Value) -> FinvoiceResult<Invoice> {
    let data = match result.get("data") {
        Some(data) if !data.is_null() => data.clone(),
        _ => {
            return Err(FinvoiceError::extraction(
                "No data returned from extraction service",
            ))
        }
    };

    serde_json::from_value(data).map_err(|e| {
        FinvoiceError::extraction_with_source("Extraction result did not match invoice schema", e)
    })
}

async fn service_error(context: &str, response: Response) -> FinvoiceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    FinvoiceError::extraction(format!("{}: HTTP {} {}", context, status.as_u16(), body))
}
