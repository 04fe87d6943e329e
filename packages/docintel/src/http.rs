//! HTTP-backed implementations of the backend seams.
//!
//! Adapts [`dashboard_api::DashboardClient`] onto the core's traits and
//! maps transport errors into each concern's error type.

use async_trait::async_trait;
use serde_json::Value;

use dashboard_api::{ApiError, DashboardClient, UploadedFile};

use crate::error::{DrillDownError, ExtractionError, JobError};
use crate::traits::backend::{
    AnalyticsRow, AnalyticsSource, ExtractBackend, ExtractResponse, FileUpload, JobApi,
};
use crate::types::job::JobStatusReport;
use crate::types::schema::Schema;

/// Live backend over the dashboard REST API.
pub struct HttpBackend {
    api: DashboardClient,
}

impl HttpBackend {
    pub fn new(api: DashboardClient) -> Self {
        Self { api }
    }

    /// Build from the `DASHBOARD_API_URL` environment variable.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(DashboardClient::from_env()?))
    }
}

#[async_trait]
impl ExtractBackend for HttpBackend {
    async fn extract(
        &self,
        file: FileUpload,
        schema: &Schema,
    ) -> Result<ExtractResponse, ExtractionError> {
        let template_json =
            serde_json::to_string(schema).map_err(|e| ExtractionError::Backend(Box::new(e)))?;
        let response = self
            .api
            .extract(UploadedFile::new(file.name, file.bytes), template_json)
            .await
            .map_err(extraction_error)?;
        Ok(ExtractResponse {
            success: response.success,
            data: response.data,
            template_schema: response.template_schema,
        })
    }
}

fn extraction_error(error: ApiError) -> ExtractionError {
    match error {
        ApiError::Api { status, message } => ExtractionError::Api {
            status,
            message: if message.is_empty() {
                "extraction request failed".to_string()
            } else {
                message
            },
        },
        other => ExtractionError::Backend(Box::new(other)),
    }
}

#[async_trait]
impl JobApi for HttpBackend {
    async fn start_job(&self, job_type: &str, params: &Value) -> Result<String, JobError> {
        // Any failure of the initiating call means the job was not
        // accepted.
        let started = self
            .api
            .start_job(job_type, params)
            .await
            .map_err(|e| JobError::Submission(e.to_string()))?;
        Ok(started.job_id)
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, JobError> {
        let status = self
            .api
            .job_status(job_id)
            .await
            .map_err(|e| JobError::Transport(Box::new(e)))?;
        Ok(JobStatusReport {
            status: status.status,
            message: status.message,
            row_count: status.row_count,
            filename: status.filename,
            download_url: status.download_url,
            static_url: status.static_url,
        })
    }
}

#[async_trait]
impl AnalyticsSource for HttpBackend {
    async fn products(&self) -> Result<Vec<AnalyticsRow>, DrillDownError> {
        self.api
            .products()
            .await
            .map_err(|e| DrillDownError::Fetch(Box::new(e)))
    }

    async fn segments(&self, product_id: &str) -> Result<Vec<AnalyticsRow>, DrillDownError> {
        self.api
            .segments(product_id)
            .await
            .map_err(|e| DrillDownError::Fetch(Box::new(e)))
    }

    async fn transactions(
        &self,
        product_id: &str,
        segment: &str,
    ) -> Result<Vec<AnalyticsRow>, DrillDownError> {
        self.api
            .transactions(product_id, segment)
            .await
            .map_err(|e| DrillDownError::Fetch(Box::new(e)))
    }
}
