//! Backend seams: extraction endpoint, job endpoints, analytics endpoints.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{DrillDownError, ExtractionError, JobError};
use crate::types::job::JobStatusReport;
use crate::types::schema::Schema;

/// One analytics row as returned by the margin endpoints.
///
/// Rows are schemaless; the drill-down navigator decides which fields
/// key the next fetch.
pub type AnalyticsRow = serde_json::Map<String, Value>;

/// A file handed to the extraction orchestrator.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// What the extraction endpoint answered.
#[derive(Debug, Clone)]
pub struct ExtractResponse {
    pub success: bool,
    /// Extracted document data; absent when nothing was extracted.
    pub data: Option<Value>,
    /// Schema the backend detected on the auto-detect path, still in
    /// wire form. Decoded by the orchestrator so a malformed payload is
    /// an extraction error, not a transport one.
    pub template_schema: Option<Value>,
}

/// The extraction endpoint.
#[async_trait]
pub trait ExtractBackend: Send + Sync {
    /// Submit a file plus the wire-format schema for extraction.
    async fn extract(
        &self,
        file: FileUpload,
        schema: &Schema,
    ) -> Result<ExtractResponse, ExtractionError>;
}

/// The asynchronous job endpoints.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// Start a job of the given type. Resolves to the job id on an
    /// accepted response, `JobError::Submission` otherwise.
    async fn start_job(&self, job_type: &str, params: &Value) -> Result<String, JobError>;

    /// Fetch the current status of a job.
    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, JobError>;
}

/// The margin-analytics drill-down endpoints.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    /// The root product list.
    async fn products(&self) -> Result<Vec<AnalyticsRow>, DrillDownError>;

    /// Segments for one product.
    async fn segments(&self, product_id: &str) -> Result<Vec<AnalyticsRow>, DrillDownError>;

    /// Transactions for one product segment.
    async fn transactions(
        &self,
        product_id: &str,
        segment: &str,
    ) -> Result<Vec<AnalyticsRow>, DrillDownError>;
}
