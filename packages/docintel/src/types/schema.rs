//! Wire-format schema exchanged with the extraction backend.

use serde::{Deserialize, Serialize};

/// Required/optional field lists for repeating line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemsSchema {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

/// The schema payload consumed and produced by the extraction endpoint.
///
/// `auto_detect` is true iff the field lists are empty at request time,
/// signaling the backend to infer the template itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub optional_fields: Vec<String>,
    #[serde(default)]
    pub items_schema: ItemsSchema,
    #[serde(default)]
    pub auto_detect: bool,
}

impl Schema {
    /// An empty auto-detect schema.
    pub fn auto(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auto_detect: true,
            ..Default::default()
        }
    }

    /// True when no top-level or item field is declared.
    pub fn is_empty(&self) -> bool {
        self.required_fields.is_empty()
            && self.optional_fields.is_empty()
            && self.items_schema.required.is_empty()
            && self.items_schema.optional.is_empty()
    }
}
