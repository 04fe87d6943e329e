//! Templates and column definitions.
//!
//! A template is a named, ordered list of column definitions describing
//! what to extract from a document. Columns scoped to repeating line
//! items carry an explicit `is_item_field` flag; the historical
//! `"Item "` name prefix is a display convention only, computed by
//! [`ColumnDefinition::display_name`] at render time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Data type of one extraction target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Text,
    Number,
    Currency,
    Date,
    Boolean,
}

impl DataType {
    /// The set of tokens accepted in imported column schemas.
    pub const VALID_TOKENS: [&'static str; 5] =
        ["text", "number", "currency", "date", "boolean"];

    /// Parse a lowercase wire token. Returns `None` for unknown tokens.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "text" => Some(Self::Text),
            "number" => Some(Self::Number),
            "currency" => Some(Self::Currency),
            "date" => Some(Self::Date),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Currency => "currency",
            Self::Date => "date",
            Self::Boolean => "boolean",
        }
    }
}

/// One named, typed, required/optional extraction target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    /// Human-readable name, e.g. `"Order Number"`. Unique within a
    /// template's column list; the extraction mapping is keyed on it.
    pub name: String,

    pub data_type: DataType,

    /// Optional validation pattern. Empty string when unset.
    #[serde(default)]
    pub regex_pattern: String,

    #[serde(default)]
    pub required: bool,

    /// True when the column targets repeating line items rather than
    /// the top-level document.
    #[serde(default)]
    pub is_item_field: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            regex_pattern: String::new(),
            required: false,
            is_item_field: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn item_field(mut self) -> Self {
        self.is_item_field = true;
        self
    }

    pub fn with_regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex_pattern = pattern.into();
        self
    }

    /// Display name for grids and exports.
    ///
    /// Item columns are prefixed with the literal `"Item "` token. This
    /// composes with names that already start with `Item`, producing a
    /// doubled prefix for fields like `item_code`; the backend expects
    /// that naming, so it is preserved here.
    pub fn display_name(&self) -> String {
        if self.is_item_field {
            format!("Item {}", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Wire-format field key: lowercased, spaces replaced with underscores.
    ///
    /// Lossy for names whose title-cased form is not cleanly invertible
    /// (acronyms); documented, not worked around.
    pub fn field_key(&self) -> String {
        self.name.to_lowercase().replace(' ', "_")
    }
}

/// Where a template came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateSource {
    /// Authored through the template builder.
    User,
    /// Synthesized from a built-in schema at first load.
    Builtin,
}

/// A named, ordered list of column definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
    pub source: TemplateSource,
    pub created_at: DateTime<Utc>,
}

impl Template {
    /// Create a new user-authored template draft.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            columns: Vec::new(),
            source: TemplateSource::User,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn builtin(
        name: impl Into<String>,
        description: impl Into<String>,
        columns: Vec<ColumnDefinition>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            columns,
            source: TemplateSource::Builtin,
            created_at: Utc::now(),
        }
    }

    pub fn with_columns(mut self, columns: Vec<ColumnDefinition>) -> Self {
        self.columns = columns;
        self
    }

    pub fn is_builtin(&self) -> bool {
        self.source == TemplateSource::Builtin
    }
}
