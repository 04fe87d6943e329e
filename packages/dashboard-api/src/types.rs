use serde::Deserialize;
use serde_json::Value;

/// A file to upload to the extraction endpoint.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename, forwarded as the multipart part filename.
    pub name: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Response from `POST /api/v1/pdf/extract`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractResponse {
    pub success: bool,
    /// Extracted document data. Absent when extraction produced nothing.
    #[serde(default)]
    pub data: Option<Value>,
    /// Schema the backend detected, returned on the auto-detect path.
    #[serde(default)]
    pub template_schema: Option<Value>,
}

/// Response from `POST /api/v1/excel/process/{job_type}`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStartResponse {
    pub job_id: String,
}

/// Response from `GET /api/v1/excel/status/{job_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    /// One of `queued`, `running`, `completed`, `error`.
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub row_count: Option<u64>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub static_url: Option<String>,
}

/// Error body shape used by the backend for non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

/// One analytics row as returned by the margin endpoints.
///
/// Rows are schemaless on the wire; the drill-down layer decides which
/// fields key the next fetch.
pub type AnalyticsRow = serde_json::Map<String, Value>;
