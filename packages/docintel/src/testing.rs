//! Testing utilities including mock backend implementations.
//!
//! Useful for testing applications built on the core without real
//! network calls. Each mock takes canned responses through builder
//! methods and records the calls made to it for assertions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use serde_json::Value;

use crate::error::{DrillDownError, ExtractionError, JobError};
use crate::traits::backend::{
    AnalyticsRow, AnalyticsSource, ExtractBackend, ExtractResponse, FileUpload, JobApi,
};
use crate::types::job::JobStatusReport;
use crate::types::schema::Schema;

/// Build an analytics row from field/value pairs.
pub fn analytics_row(fields: &[(&str, Value)]) -> AnalyticsRow {
    fields
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// Mock job API with a scripted status sequence.
///
/// Statuses are served in order; once the script runs out, the last
/// entry repeats, which makes "always running" scripts a one-liner.
#[derive(Default)]
pub struct MockJobApi {
    job_id: String,
    submission_error: Option<String>,
    statuses: Vec<JobStatusReport>,
    status_calls: AtomicUsize,
    started: Mutex<Vec<String>>,
}

impl MockJobApi {
    pub fn new() -> Self {
        Self {
            job_id: "job-1".to_string(),
            ..Default::default()
        }
    }

    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = job_id.into();
        self
    }

    /// Script the status sequence returned by `job_status`.
    pub fn with_statuses(mut self, statuses: Vec<JobStatusReport>) -> Self {
        self.statuses = statuses;
        self
    }

    /// Make `start_job` reject with a submission error.
    pub fn with_submission_error(mut self, message: impl Into<String>) -> Self {
        self.submission_error = Some(message.into());
        self
    }

    /// Number of status requests made so far.
    pub fn status_call_count(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Job types passed to `start_job`, in call order.
    pub fn started_jobs(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobApi for MockJobApi {
    async fn start_job(&self, job_type: &str, _params: &Value) -> Result<String, JobError> {
        if let Some(message) = &self.submission_error {
            return Err(JobError::Submission(message.clone()));
        }
        self.started.lock().unwrap().push(job_type.to_string());
        Ok(self.job_id.clone())
    }

    async fn job_status(&self, _job_id: &str) -> Result<JobStatusReport, JobError> {
        let call = self.status_calls.fetch_add(1, Ordering::SeqCst);
        if self.statuses.is_empty() {
            return Ok(JobStatusReport::with_status("completed"));
        }
        let index = call.min(self.statuses.len() - 1);
        Ok(self.statuses[index].clone())
    }
}

/// Mock extraction backend returning one canned response.
#[derive(Default)]
pub struct MockExtractBackend {
    response: RwLock<Option<ExtractResponse>>,
    api_error: Option<(u16, String)>,
    schemas: Mutex<Vec<Schema>>,
    files: Mutex<Vec<String>>,
}

impl MockExtractBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: ExtractResponse) -> Self {
        *self.response.write().unwrap() = Some(response);
        self
    }

    /// Make `extract` fail as if the endpoint returned a non-2xx status.
    pub fn with_api_error(mut self, status: u16, message: impl Into<String>) -> Self {
        self.api_error = Some((status, message.into()));
        self
    }

    /// Schemas submitted so far, in call order.
    pub fn submitted_schemas(&self) -> Vec<Schema> {
        self.schemas.lock().unwrap().clone()
    }

    /// Filenames submitted so far, in call order.
    pub fn submitted_files(&self) -> Vec<String> {
        self.files.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtractBackend for MockExtractBackend {
    async fn extract(
        &self,
        file: FileUpload,
        schema: &Schema,
    ) -> Result<ExtractResponse, ExtractionError> {
        self.schemas.lock().unwrap().push(schema.clone());
        self.files.lock().unwrap().push(file.name);
        if let Some((status, message)) = &self.api_error {
            return Err(ExtractionError::Api {
                status: *status,
                message: message.clone(),
            });
        }
        self.response
            .read()
            .unwrap()
            .clone()
            .ok_or(ExtractionError::NoData)
    }
}

/// Which analytics endpoint a mock call hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsCall {
    Products,
    Segments(String),
    Transactions(String, String),
}

/// Mock analytics source with per-level canned rows and one-shot
/// failure injection.
#[derive(Default)]
pub struct MockAnalyticsSource {
    products: Vec<AnalyticsRow>,
    segments: HashMap<String, Vec<AnalyticsRow>>,
    transactions: HashMap<(String, String), Vec<AnalyticsRow>>,
    fail_next: AtomicBool,
    calls: Mutex<Vec<AnalyticsCall>>,
}

impl MockAnalyticsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(mut self, rows: Vec<AnalyticsRow>) -> Self {
        self.products = rows;
        self
    }

    pub fn with_segments(mut self, product_id: impl Into<String>, rows: Vec<AnalyticsRow>) -> Self {
        self.segments.insert(product_id.into(), rows);
        self
    }

    pub fn with_transactions(
        mut self,
        product_id: impl Into<String>,
        segment: impl Into<String>,
        rows: Vec<AnalyticsRow>,
    ) -> Self {
        self.transactions
            .insert((product_id.into(), segment.into()), rows);
        self
    }

    /// Make the next fetch fail, then recover.
    pub fn fail_next_fetch(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<AnalyticsCall> {
        self.calls.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), DrillDownError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DrillDownError::Fetch(Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "injected fetch failure",
            ))));
        }
        Ok(())
    }
}

#[async_trait]
impl AnalyticsSource for MockAnalyticsSource {
    async fn products(&self) -> Result<Vec<AnalyticsRow>, DrillDownError> {
        self.calls.lock().unwrap().push(AnalyticsCall::Products);
        self.check_failure()?;
        Ok(self.products.clone())
    }

    async fn segments(&self, product_id: &str) -> Result<Vec<AnalyticsRow>, DrillDownError> {
        self.calls
            .lock()
            .unwrap()
            .push(AnalyticsCall::Segments(product_id.to_string()));
        self.check_failure()?;
        Ok(self.segments.get(product_id).cloned().unwrap_or_default())
    }

    async fn transactions(
        &self,
        product_id: &str,
        segment: &str,
    ) -> Result<Vec<AnalyticsRow>, DrillDownError> {
        self.calls.lock().unwrap().push(AnalyticsCall::Transactions(
            product_id.to_string(),
            segment.to_string(),
        ));
        self.check_failure()?;
        Ok(self
            .transactions
            .get(&(product_id.to_string(), segment.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
