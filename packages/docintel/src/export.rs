//! Row export for download: CSV and JSON.
//!
//! One flat record per row, column display name → value. Dates come out
//! as `YYYY-MM-DD` in both formats; the synthetic row id leads each
//! record.

use crate::error::ExportError;
use crate::types::row::{CellValue, Row};
use crate::types::template::ColumnDefinition;

/// Render rows as a CSV document with a header row.
pub fn rows_to_csv(columns: &[ColumnDefinition], rows: &[Row]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = Vec::with_capacity(columns.len() + 1);
    header.push("id".to_string());
    header.extend(columns.iter().map(ColumnDefinition::display_name));
    writer.write_record(&header)?;

    for row in rows {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(row.id.to_string());
        for column in columns {
            record.push(
                row.get(&column.display_name())
                    .map(CellValue::to_csv_field)
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Render rows as a JSON array of flat records.
pub fn rows_to_json(rows: &[Row]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::template::DataType;
    use chrono::NaiveDate;

    fn sample() -> (Vec<ColumnDefinition>, Vec<Row>) {
        let columns = vec![
            ColumnDefinition::new("Order Number", DataType::Text),
            ColumnDefinition::new("Order Date", DataType::Date),
            ColumnDefinition::new("Quantity", DataType::Number).item_field(),
        ];
        let mut row = Row::new(1);
        row.cells.insert(
            "Order Number".to_string(),
            CellValue::Text("SO-42".to_string()),
        );
        row.cells.insert(
            "Order Date".to_string(),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()),
        );
        row.cells
            .insert("Item Quantity".to_string(), CellValue::Null);
        (columns, vec![row])
    }

    #[test]
    fn csv_uses_display_names_and_iso_dates() {
        let (columns, rows) = sample();
        let csv = rows_to_csv(&columns, &rows).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,Order Number,Order Date,Item Quantity"
        );
        assert_eq!(lines.next().unwrap(), "1,SO-42,2024-03-15,");
    }

    #[test]
    fn json_is_one_flat_record_per_row() {
        let (_, rows) = sample();
        let json = rows_to_json(&rows).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["id"], 1);
        assert_eq!(parsed[0]["Order Number"], "SO-42");
        assert_eq!(parsed[0]["Order Date"], "2024-03-15");
        assert_eq!(parsed[0]["Item Quantity"], serde_json::Value::Null);
    }
}
