//! Pure REST client for the dashboard backend API.
//!
//! A minimal client for the document-processing backend. Supports the
//! PDF extraction endpoint, the Excel job endpoints (start + status),
//! and the margin-analytics drill-down endpoints.
//!
//! # Example
//!
//! ```rust,ignore
//! use dashboard_api::{DashboardClient, UploadedFile};
//!
//! let client = DashboardClient::new("http://localhost:8000");
//!
//! let start = client.start_job("margin-analysis", &serde_json::json!({})).await?;
//! let status = client.job_status(&start.job_id).await?;
//! println!("{}", status.status);
//! ```

pub mod error;
pub mod types;

pub use error::{ApiError, Result};
pub use types::{
    AnalyticsRow, ExtractResponse, JobStartResponse, JobStatusResponse, UploadedFile,
};

use reqwest::multipart;
use serde_json::Value;
use types::ErrorBody;

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "DASHBOARD_API_URL";

pub struct DashboardClient {
    client: reqwest::Client,
    base_url: String,
}

impl DashboardClient {
    /// Create a client for the given base URL (no trailing slash needed).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create from the `DASHBOARD_API_URL` environment variable.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV)
            .map_err(|_| ApiError::Config(format!("{BASE_URL_ENV} environment variable not set")))?;
        Ok(Self::new(base_url))
    }

    /// Submit a document plus a template schema for extraction.
    ///
    /// `template_json` is the wire-format schema, sent as the `template`
    /// form field alongside the file part.
    pub async fn extract(
        &self,
        file: UploadedFile,
        template_json: String,
    ) -> Result<ExtractResponse> {
        let url = format!("{}/api/v1/pdf/extract", self.base_url);
        tracing::info!(file = %file.name, "submitting document for extraction");

        let part = multipart::Part::bytes(file.bytes).file_name(file.name);
        let form = multipart::Form::new()
            .part("file", part)
            .text("template", template_json);

        let resp = self.client.post(&url).multipart(form).send().await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }

    /// Start an asynchronous processing job. Returns immediately with the job id.
    pub async fn start_job(&self, job_type: &str, params: &Value) -> Result<JobStartResponse> {
        let url = format!("{}/api/v1/excel/process/{}", self.base_url, job_type);
        tracing::info!(job_type, "starting processing job");

        let resp = self.client.post(&url).json(params).send().await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }

    /// Fetch the current status of a job.
    pub async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse> {
        let url = format!("{}/api/v1/excel/status/{}", self.base_url, job_id);
        let resp = self.client.get(&url).send().await?;
        let resp = Self::check(resp).await?;
        let status: JobStatusResponse = resp.json().await?;
        tracing::debug!(job_id, status = %status.status, "job status");
        Ok(status)
    }

    /// List products for the margin-analytics table.
    pub async fn products(&self) -> Result<Vec<AnalyticsRow>> {
        let url = format!("{}/api/v1/margin/products", self.base_url);
        let resp = self.client.get(&url).send().await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }

    /// List segments for one product.
    pub async fn segments(&self, product_id: &str) -> Result<Vec<AnalyticsRow>> {
        let url = format!("{}/api/v1/margin/products/{}/segments", self.base_url, product_id);
        let resp = self.client.get(&url).send().await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }

    /// List transactions for one product segment.
    pub async fn transactions(&self, product_id: &str, segment: &str) -> Result<Vec<AnalyticsRow>> {
        let url = format!(
            "{}/api/v1/margin/products/{}/transactions",
            self.base_url, product_id
        );
        let resp = self
            .client
            .get(&url)
            .query(&[("segment", segment)])
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }

    /// Turn a non-success response into `ApiError::Api`, pulling the
    /// backend `detail` message out of the body when present.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or(body);
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
