//! Post-extraction rows and typed cell values.

use chrono::{DateTime, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// A typed cell value inside an extracted row.
///
/// Values pass through from the backend unchanged except for date
/// conversion; numeric/currency formatting is a view concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    /// Serializes as `YYYY-MM-DD`.
    Date(NaiveDate),
    Text(String),
}

impl CellValue {
    /// Convert a raw JSON value without any type coercion.
    ///
    /// Arrays and objects are stringified; the backend is not expected
    /// to put them in scalar fields.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n
                .as_f64()
                .map(Self::Number)
                .unwrap_or_else(|| Self::Text(n.to_string())),
            Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }

    /// Render for a CSV field: dates as `YYYY-MM-DD`, nulls empty.
    pub fn to_csv_field(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Try to read a date out of a raw JSON value.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, and `MM/DD/YYYY`. Returns
/// `None` for anything else so the caller can pass the value through
/// unchanged.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?;
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| NaiveDate::parse_from_str(s, "%m/%d/%Y").ok())
}

/// One extracted row: a synthetic id plus ordered column-name → value cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Assigned by the orchestrator in emission order, starting at 1.
    pub id: i64,
    #[serde(flatten)]
    pub cells: IndexMap<String, CellValue>,
}

impl Row {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            cells: IndexMap::new(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_passes_values_through() {
        assert_eq!(CellValue::from_json(&Value::Null), CellValue::Null);
        assert_eq!(
            CellValue::from_json(&serde_json::json!(12.5)),
            CellValue::Number(12.5)
        );
        assert_eq!(
            CellValue::from_json(&serde_json::json!("299.00")),
            CellValue::Text("299.00".to_string())
        );
        assert_eq!(
            CellValue::from_json(&serde_json::json!(true)),
            CellValue::Bool(true)
        );
    }

    #[test]
    fn parse_date_accepts_common_formats() {
        let expect = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date(&serde_json::json!("2024-03-15")), Some(expect));
        assert_eq!(
            parse_date(&serde_json::json!("2024-03-15T10:30:00Z")),
            Some(expect)
        );
        assert_eq!(parse_date(&serde_json::json!("03/15/2024")), Some(expect));
        assert_eq!(parse_date(&serde_json::json!("not a date")), None);
        assert_eq!(parse_date(&serde_json::json!(20240315)), None);
    }

    #[test]
    fn date_cell_serializes_iso() {
        let mut row = Row::new(1);
        row.cells.insert(
            "Order Date".to_string(),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()),
        );
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"id":1,"Order Date":"2024-03-15"}"#);
    }
}
