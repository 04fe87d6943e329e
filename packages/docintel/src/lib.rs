//! Template-Driven Extraction & Job-Orchestration Core
//!
//! The engineering core behind the document-intelligence dashboard:
//! schema-to-column transformation, template persistence, asynchronous
//! job polling, extraction orchestration, and the drill-down navigation
//! model used by the margin-analytics tables. Rendering, styling, and
//! the backend service itself are out of scope; the core talks to them
//! only through trait seams.
//!
//! # Usage
//!
//! ```rust,ignore
//! use docintel::{DrillDownNavigator, Extractor, FileUpload, HttpBackend, JobClient};
//!
//! let backend = HttpBackend::from_env()?;
//! let extractor = Extractor::new(backend);
//!
//! let template = repo.get(template_id).await?;
//! let outcome = extractor
//!     .extract(&template, FileUpload::new("invoice.pdf", bytes))
//!     .await?;
//! println!("{}", docintel::export::rows_to_csv(&outcome.columns, &outcome.rows)?);
//! ```
//!
//! # Modules
//!
//! - [`types`] - Templates, schemas, jobs, rows
//! - [`traits`] - Backend and storage seams
//! - [`pipeline`] - Schema transforms and the extraction orchestrator
//! - [`jobs`] - Submit-and-poll job client
//! - [`drilldown`] - Breadcrumbed drill-down navigator
//! - [`templates`] - Template repository with built-in merge
//! - [`stores`] - Storage implementations (MemoryTemplateStore)
//! - [`export`] - CSV/JSON row export
//! - [`http`] - Live REST adapter over `dashboard-api`
//! - [`testing`] - Mock implementations for testing

pub mod drilldown;
pub mod error;
pub mod export;
pub mod http;
pub mod jobs;
pub mod pipeline;
pub mod stores;
pub mod templates;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    DrillDownError, ExportError, ExtractionError, JobError, TemplateError, ValidationError,
};
pub use traits::{
    backend::{AnalyticsRow, AnalyticsSource, ExtractBackend, ExtractResponse, FileUpload, JobApi},
    store::TemplateStore,
};
pub use types::{
    job::{JobStatus, JobStatusReport, PollConfig},
    row::{CellValue, Row},
    schema::{ItemsSchema, Schema},
    template::{ColumnDefinition, DataType, Template, TemplateSource},
};

// Re-export the operational pieces
pub use drilldown::{DrillDownNavigator, DrillLevel, Entity};
pub use http::HttpBackend;
pub use jobs::{JobClient, PollState};
pub use pipeline::{
    columns_to_schema, infer_data_type, parse_columns_json, schema_to_columns, title_case,
    ExtractionOutcome, Extractor,
};
pub use stores::MemoryTemplateStore;
pub use templates::{TemplateRepository, TEMPLATE_STORE_KEY};
