//! HTTP client for the pipeline job API.
//!
//! All state shown by the dashboard is server-of-record; this client is the
//! only place that talks to the backend. A 404 on job lookup is a distinct
//! error so callers can show "job not found" instead of a generic failure.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::Settings;
use crate::models::{
    CancelResponse, ClassificationSheet, Job, JobCreateRequest, ResultsManifest,
};

/// Errors surfaced by the pipeline client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The requested resource does not exist (HTTP 404).
    #[error("job not found")]
    NotFound,
    /// Any other non-2xx response.
    #[error("request failed with HTTP {0}")]
    Status(u16),
    /// Network-level failure (connect, timeout, TLS).
    #[error("request error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Typed client for the backend job orchestration service.
#[derive(Clone)]
pub struct PipelineClient {
    client: Client,
    base_url: String,
}

impl PipelineClient {
    /// Create a new client against the given base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(concat!("docwatch/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from resolved settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.resolved_api_url(), settings.request_timeout())
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a job by id.
    pub async fn get_job(&self, job_id: &str) -> Result<Job, ClientError> {
        let url = format!("{}/api/jobs/{}", self.base_url, job_id);
        self.get_json(&url).await
    }

    /// List recent jobs.
    pub async fn list_jobs(&self, limit: usize) -> Result<Vec<Job>, ClientError> {
        let url = format!("{}/api/jobs/?limit={}", self.base_url, limit);
        self.get_json(&url).await
    }

    /// Create a new job.
    pub async fn create_job(&self, request: &JobCreateRequest) -> Result<Job, ClientError> {
        let url = format!("{}/api/jobs/", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;
        Self::decode(response).await
    }

    /// Request cancellation of a job.
    pub async fn cancel_job(&self, job_id: &str) -> Result<CancelResponse, ClientError> {
        let url = format!("{}/api/jobs/{}/cancel", self.base_url, job_id);
        let response = self.client.post(&url).send().await?;
        Self::decode(response).await
    }

    /// Fetch the results manifest for a job.
    pub async fn get_results(&self, job_id: &str) -> Result<ResultsManifest, ClientError> {
        let url = format!("{}/api/jobs/{}/results", self.base_url, job_id);
        self.get_json(&url).await
    }

    /// Fetch the CSV export for a job, returned verbatim.
    pub async fn get_csv(&self, job_id: &str) -> Result<String, ClientError> {
        let url = format!("{}/api/jobs/{}/csv", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response)?;
        Ok(response.text().await?)
    }

    /// Fetch the classification sheet for review.
    pub async fn get_classification(
        &self,
        job_id: &str,
    ) -> Result<ClassificationSheet, ClientError> {
        let url = format!("{}/api/jobs/{}/classification", self.base_url, job_id);
        self.get_json(&url).await
    }

    /// Submit a reviewed classification sheet.
    pub async fn submit_review(
        &self,
        job_id: &str,
        sheet: &ClassificationSheet,
    ) -> Result<(), ClientError> {
        let url = format!("{}/api/jobs/{}/classification", self.base_url, job_id);
        let response = self.client.post(&url).json(sheet).send().await?;
        Self::check_status(response)?;
        Ok(())
    }

    /// Fetch the integration JSON payload, passed through untouched.
    pub async fn get_integration(&self, job_id: &str) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}/api/jobs/{}/integration", self.base_url, job_id);
        self.get_json(&url).await
    }

    /// Fetch a rendered figure image by content hash.
    pub async fn get_image(&self, job_id: &str, sha: &str) -> Result<Vec<u8>, ClientError> {
        let url = format!("{}/api/jobs/{}/images/{}", self.base_url, job_id, sha);
        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response)?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let response = Self::check_status(response)?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
