//! Extraction orchestrator: template in, typed rows out.
//!
//! Builds the wire schema from a template, submits the document through
//! the [`ExtractBackend`] seam, and maps the response into row entities.
//! Handles both the fixed-schema path and the auto-detect path where
//! the backend returns the schema it inferred.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::pipeline::columns::{columns_to_schema, schema_to_columns};
use crate::traits::backend::{ExtractBackend, FileUpload};
use crate::types::row::{parse_date, CellValue, Row};
use crate::types::schema::Schema;
use crate::types::template::{ColumnDefinition, DataType, Template};

/// Field name the backend uses for the repeating line-item array.
/// Structural, never a displayable column.
const ITEMS_FIELD: &str = "items";

/// Result of one extraction: rows plus the column list that produced
/// them, which differs from the template's on the auto-detect path.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub rows: Vec<Row>,
    pub columns: Vec<ColumnDefinition>,
}

/// Orchestrates one extraction at a time against a backend.
pub struct Extractor<B: ExtractBackend> {
    backend: B,
    in_flight: Semaphore,
}

impl<B: ExtractBackend> Extractor<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            // One extraction per orchestrator instance; a second start
            // while one is in flight is rejected, not queued.
            in_flight: Semaphore::new(1),
        }
    }

    /// Run the full extraction flow for one uploaded file.
    pub async fn extract(
        &self,
        template: &Template,
        file: FileUpload,
    ) -> Result<ExtractionOutcome, ExtractionError> {
        let _permit = self
            .in_flight
            .try_acquire()
            .map_err(|_| ExtractionError::Busy)?;

        let schema = columns_to_schema(&template.name, &template.description, &template.columns);
        info!(
            template = %template.name,
            file = %file.name,
            auto_detect = schema.auto_detect,
            "submitting extraction"
        );

        let response = self.backend.extract(file, &schema).await?;
        if !response.success {
            return Err(ExtractionError::NoData);
        }
        let data = response
            .data
            .as_ref()
            .and_then(Value::as_object)
            .ok_or(ExtractionError::NoData)?;

        let mut columns = template.columns.clone();
        if columns.is_empty() {
            if let Some(detected) = &response.template_schema {
                columns = detected_columns(detected)?;
                debug!(count = columns.len(), "regenerated columns from detected schema");
            }
        }

        let rows = build_rows(data, &columns);
        info!(rows = rows.len(), "extraction complete");
        Ok(ExtractionOutcome { rows, columns })
    }
}

/// Decode the backend-detected schema and expand it, skipping the
/// structural `items` field.
fn detected_columns(detected: &Value) -> Result<Vec<ColumnDefinition>, ExtractionError> {
    let schema: Schema =
        serde_json::from_value(detected.clone()).map_err(ExtractionError::MalformedSchema)?;
    Ok(schema_to_columns(&schema)
        .into_iter()
        .filter(|column| column.field_key() != ITEMS_FIELD)
        .collect())
}

/// Build rows from the extracted data object.
///
/// With an `items` array: one row per item, item columns read from the
/// item object, non-item columns broadcast from the top level. Without
/// one: a single row built entirely from the top level.
fn build_rows(data: &Map<String, Value>, columns: &[ColumnDefinition]) -> Vec<Row> {
    match data.get(ITEMS_FIELD).and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let item_fields = item.as_object();
                let cells = columns
                    .iter()
                    .map(|column| {
                        let raw = if column.is_item_field {
                            item_fields.and_then(|fields| fields.get(&column.field_key()))
                        } else {
                            data.get(&column.field_key())
                        };
                        (column.display_name(), cell_value(column, raw))
                    })
                    .collect();
                Row {
                    id: index as i64 + 1,
                    cells,
                }
            })
            .collect(),
        None => {
            let cells: IndexMap<String, CellValue> = columns
                .iter()
                .map(|column| {
                    (
                        column.display_name(),
                        cell_value(column, data.get(&column.field_key())),
                    )
                })
                .collect();
            vec![Row { id: 1, cells }]
        }
    }
}

/// Convert one raw value for a column. Date columns with a present,
/// parseable value become dates; everything else passes through.
fn cell_value(column: &ColumnDefinition, raw: Option<&Value>) -> CellValue {
    let Some(value) = raw else {
        return CellValue::Null;
    };
    if column.data_type == DataType::Date {
        if let Some(date) = parse_date(value) {
            return CellValue::Date(date);
        }
    }
    CellValue::from_json(value)
}
