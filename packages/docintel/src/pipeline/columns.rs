//! Schema ⇄ column transformations and data-type inference.
//!
//! Pure data transformation, no I/O. The inference rules and their
//! precedence are load-bearing for backend compatibility: a field named
//! `total_quantity` is currency, not number, because the currency check
//! runs first.

use serde_json::Value;

use crate::error::ValidationError;
use crate::types::schema::Schema;
use crate::types::template::{ColumnDefinition, DataType};

/// Substrings that mark a field as currency. Checked before the number
/// hints; precedence must not change.
const CURRENCY_HINTS: [&str; 6] = ["total", "subtotal", "discount", "freight", "tax", "price"];

/// Substrings that mark a field as numeric.
const NUMBER_HINTS: [&str; 3] = ["quantity", "number", "items"];

/// Infer a column data type from a wire field name.
///
/// Case-insensitive substring rules, in precedence order:
/// `date` → Date, currency hints → Currency, number hints → Number,
/// anything else → Text.
pub fn infer_data_type(field_name: &str) -> DataType {
    let lower = field_name.to_lowercase();
    if lower.contains("date") {
        return DataType::Date;
    }
    if CURRENCY_HINTS.iter().any(|hint| lower.contains(hint)) {
        return DataType::Currency;
    }
    if NUMBER_HINTS.iter().any(|hint| lower.contains(hint)) {
        return DataType::Number;
    }
    DataType::Text
}

/// Turn a wire field name into a display name: split on `_`, title-case
/// each token, join with spaces.
pub fn title_case(field_name: &str) -> String {
    field_name
        .split('_')
        .filter(|token| !token.is_empty())
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn column_for(field: &str, required: bool, is_item_field: bool) -> ColumnDefinition {
    ColumnDefinition {
        name: title_case(field),
        data_type: infer_data_type(field),
        regex_pattern: String::new(),
        required,
        is_item_field,
    }
}

/// Expand a wire schema into column definitions.
///
/// Order is required fields, optional fields, item required, item
/// optional. No deduplication: colliding field names yield colliding
/// columns.
pub fn schema_to_columns(schema: &Schema) -> Vec<ColumnDefinition> {
    let mut columns = Vec::with_capacity(
        schema.required_fields.len()
            + schema.optional_fields.len()
            + schema.items_schema.required.len()
            + schema.items_schema.optional.len(),
    );
    for field in &schema.required_fields {
        columns.push(column_for(field, true, false));
    }
    for field in &schema.optional_fields {
        columns.push(column_for(field, false, false));
    }
    for field in &schema.items_schema.required {
        columns.push(column_for(field, true, true));
    }
    for field in &schema.items_schema.optional {
        columns.push(column_for(field, false, true));
    }
    columns
}

/// Collapse column definitions back into a wire schema.
///
/// Item scoping comes from the explicit `is_item_field` flag, not the
/// display prefix. `auto_detect` is set iff required, optional, and
/// item-required lists all come out empty.
pub fn columns_to_schema(
    name: impl Into<String>,
    description: impl Into<String>,
    columns: &[ColumnDefinition],
) -> Schema {
    let mut schema = Schema {
        name: name.into(),
        description: description.into(),
        ..Default::default()
    };
    for column in columns {
        let key = column.field_key();
        match (column.is_item_field, column.required) {
            (false, true) => schema.required_fields.push(key),
            (false, false) => schema.optional_fields.push(key),
            (true, true) => schema.items_schema.required.push(key),
            (true, false) => schema.items_schema.optional.push(key),
        }
    }
    schema.auto_detect = schema.required_fields.is_empty()
        && schema.optional_fields.is_empty()
        && schema.items_schema.required.is_empty();
    schema
}

/// Parse an imported JSON column-schema document.
///
/// All-or-nothing: any invalid entry rejects the whole import with one
/// descriptive error. `dataType` defaults to the inferred type when
/// absent; `regexPattern` and `required` default to `""` and `false`.
pub fn parse_columns_json(input: &str) -> Result<Vec<ColumnDefinition>, ValidationError> {
    let document: Value = serde_json::from_str(input)?;
    let entries = document.as_array().ok_or(ValidationError::NotAnArray)?;

    let mut columns = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let name = entry
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(ValidationError::MissingName { index })?;

        let data_type = match entry.get("dataType") {
            None | Some(Value::Null) => infer_data_type(name),
            Some(value) => {
                let token = value.as_str().unwrap_or_default();
                DataType::parse(token).ok_or_else(|| ValidationError::InvalidDataType {
                    column: name.to_string(),
                    value: token.to_string(),
                })?
            }
        };

        columns.push(ColumnDefinition {
            name: name.to_string(),
            data_type,
            regex_pattern: entry
                .get("regexPattern")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            required: entry
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            is_item_field: entry
                .get("isItemField")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        });
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::schema::ItemsSchema;
    use proptest::prelude::*;

    #[test]
    fn inference_precedence() {
        assert_eq!(infer_data_type("order_date"), DataType::Date);
        // Currency hints run before number hints.
        assert_eq!(infer_data_type("total_quantity"), DataType::Currency);
        assert_eq!(infer_data_type("quantity"), DataType::Number);
        // Substring matching only: "order_number" contains "number",
        // "qty" contains no hint at all.
        assert_eq!(infer_data_type("order_number"), DataType::Number);
        assert_eq!(infer_data_type("qty"), DataType::Text);
        assert_eq!(infer_data_type("notes"), DataType::Text);
        assert_eq!(infer_data_type("Unit_Price"), DataType::Currency);
    }

    #[test]
    fn title_case_splits_on_underscores() {
        assert_eq!(title_case("order_number"), "Order Number");
        assert_eq!(title_case("notes"), "Notes");
        assert_eq!(title_case("item_code"), "Item Code");
    }

    #[test]
    fn schema_expands_in_declaration_order() {
        let schema = Schema {
            name: "orders".to_string(),
            required_fields: vec!["order_number".to_string()],
            optional_fields: vec!["notes".to_string()],
            items_schema: ItemsSchema {
                required: vec!["quantity".to_string()],
                optional: vec![],
            },
            ..Default::default()
        };

        let columns = schema_to_columns(&schema);
        assert_eq!(columns.len(), 3);

        assert_eq!(columns[0].name, "Order Number");
        assert!(columns[0].required);
        assert!(!columns[0].is_item_field);
        // "order_number" hits the "number" hint.
        assert_eq!(columns[0].data_type, DataType::Number);

        assert_eq!(columns[1].name, "Notes");
        assert!(!columns[1].required);
        assert_eq!(columns[1].data_type, DataType::Text);

        assert_eq!(columns[2].display_name(), "Item Quantity");
        assert!(columns[2].required);
        assert!(columns[2].is_item_field);
        assert_eq!(columns[2].data_type, DataType::Number);
    }

    #[test]
    fn empty_template_collapses_to_auto_detect() {
        let schema = columns_to_schema("blank", "", &[]);
        assert!(schema.auto_detect);
        assert!(schema.is_empty());
    }

    #[test]
    fn item_columns_collapse_into_items_schema() {
        let columns = vec![
            ColumnDefinition::new("Order Number", DataType::Text).required(),
            ColumnDefinition::new("Quantity", DataType::Number)
                .required()
                .item_field(),
            ColumnDefinition::new("Unit Price", DataType::Currency).item_field(),
        ];
        let schema = columns_to_schema("orders", "", &columns);
        assert_eq!(schema.required_fields, vec!["order_number"]);
        assert!(schema.optional_fields.is_empty());
        assert_eq!(schema.items_schema.required, vec!["quantity"]);
        assert_eq!(schema.items_schema.optional, vec!["unit_price"]);
        assert!(!schema.auto_detect);
    }

    #[test]
    fn import_rejects_invalid_data_type_naming_the_column() {
        let err = parse_columns_json(r#"[{"name":"Amount","dataType":"bogus"}]"#).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Amount"), "got: {message}");
        for token in DataType::VALID_TOKENS {
            assert!(message.contains(token), "missing {token} in: {message}");
        }
    }

    #[test]
    fn import_rejects_non_arrays_and_unnamed_columns() {
        assert!(matches!(
            parse_columns_json(r#"{"name":"Amount"}"#),
            Err(ValidationError::NotAnArray)
        ));
        assert!(matches!(
            parse_columns_json(r#"[{"dataType":"text"}]"#),
            Err(ValidationError::MissingName { index: 0 })
        ));
        assert!(matches!(
            parse_columns_json(r#"[{"name":"  "}]"#),
            Err(ValidationError::MissingName { index: 0 })
        ));
        assert!(parse_columns_json("not json").is_err());
    }

    #[test]
    fn import_applies_defaults() {
        let columns =
            parse_columns_json(r#"[{"name":"order_date"},{"name":"Notes","required":true}]"#)
                .unwrap();
        assert_eq!(columns[0].data_type, DataType::Date);
        assert_eq!(columns[0].regex_pattern, "");
        assert!(!columns[0].required);
        assert!(columns[1].required);
        assert_eq!(columns[1].data_type, DataType::Text);
    }

    #[test]
    fn import_is_all_or_nothing() {
        let err = parse_columns_json(
            r#"[{"name":"Fine"},{"name":"Broken","dataType":"nope"}]"#,
        );
        assert!(err.is_err());
    }

    proptest! {
        // The schema → columns → schema round-trip is idempotent for
        // clean lower_snake field names. Acronyms and pre-existing
        // "Item " tokens are documented as lossy and excluded here.
        #[test]
        fn clean_field_names_round_trip(field in "[a-z]{1,8}(_[a-z]{1,8}){0,2}") {
            let schema = Schema {
                name: "t".to_string(),
                required_fields: vec![field.clone()],
                ..Default::default()
            };
            let back = columns_to_schema("t", "", &schema_to_columns(&schema));
            prop_assert_eq!(back.required_fields, vec![field]);
        }
    }
}
