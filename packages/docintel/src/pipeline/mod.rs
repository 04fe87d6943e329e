//! Schema transformation and extraction orchestration.

pub mod columns;
pub mod extract;

pub use columns::{
    columns_to_schema, infer_data_type, parse_columns_json, schema_to_columns, title_case,
};
pub use extract::{ExtractionOutcome, Extractor};
