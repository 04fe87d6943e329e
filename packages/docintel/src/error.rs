//! Typed errors for the extraction core.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to keep every
//! failure path strongly typed and distinguishable from success. Each
//! concern gets its own enum so callers match only on the failures the
//! operation can actually produce.

use thiserror::Error;
use uuid::Uuid;

/// Errors from validating an imported JSON column-schema document.
///
/// Import is all-or-nothing: the first invalid entry fails the whole
/// document and no columns are produced.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Input was not parseable JSON.
    #[error("schema import is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Input parsed but was not a JSON array of column objects.
    #[error("schema import must be a JSON array of column definitions")]
    NotAnArray,

    /// A column entry had no usable name.
    #[error("column at index {index} is missing a non-empty \"name\"")]
    MissingName { index: usize },

    /// A column named an unknown data type.
    #[error(
        "column \"{column}\" has invalid dataType \"{value}\" \
         (valid: text, number, currency, date, boolean)"
    )]
    InvalidDataType { column: String, value: String },
}

/// Errors from starting or polling an asynchronous processing job.
#[derive(Debug, Error)]
pub enum JobError {
    /// The initiating call did not return an accepted response.
    #[error("job submission failed: {0}")]
    Submission(String),

    /// The backend reported the job as failed.
    #[error("processing failed: {0}")]
    Processing(String),

    /// The attempt budget ran out before the job reached a terminal state.
    #[error("job did not finish after {attempts} status checks")]
    Timeout { attempts: u32 },

    /// Another job is already in flight on this client.
    #[error("another job is already in flight")]
    Busy,

    /// A status request failed at the transport or protocol level.
    #[error("status request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from the extraction orchestrator.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The extraction endpoint answered with a non-success status.
    #[error("extraction request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// The backend reported success=false or returned no data object.
    #[error("No data extracted")]
    NoData,

    /// The returned `template_schema` could not be decoded.
    #[error("malformed template_schema in response: {0}")]
    MalformedSchema(#[source] serde_json::Error),

    /// Transport or serialization failure talking to the backend.
    #[error("extraction backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Another extraction is already in flight on this orchestrator.
    #[error("another extraction is already in flight")]
    Busy,
}

/// Errors from the template repository and stores.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template with this id exists.
    #[error("template not found: {id}")]
    NotFound { id: Uuid },

    /// Built-in templates cannot be modified or deleted.
    #[error("built-in template {id} cannot be modified")]
    BuiltinImmutable { id: Uuid },

    /// A column operation referenced a column the template does not have.
    #[error("column not found: {name}")]
    ColumnNotFound { name: String },

    /// The underlying key-value store failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A column-schema import was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors from the drill-down navigator.
#[derive(Debug, Error)]
pub enum DrillDownError {
    /// Already at the deepest level; no further drill-down exists.
    #[error("already at the deepest drill-down level")]
    AtMaxDepth,

    /// Drill-up target must be shallower than the current level.
    #[error("cannot drill up to level {target} from level {current}")]
    InvalidTarget { target: usize, current: usize },

    /// The selected row lacked the field that keys the next fetch.
    #[error("selected row is missing field \"{field}\"")]
    MissingField { field: String },

    /// The analytics fetch failed; level and rows are left unchanged.
    #[error("analytics fetch failed: {0}")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from exporting rows to CSV or JSON.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV buffer was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
