//! Template persistence as an injected key-value contract.
//!
//! The persisted template list is addressed by a single client; every
//! mutation is a full read-modify-write of the list, so the contract is
//! just `load` and `save`.

use async_trait::async_trait;

use crate::error::TemplateError;
use crate::types::template::Template;

/// Key-value persistence for the template list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Load the full template list stored under `key`.
    ///
    /// An unknown key yields an empty list, not an error.
    async fn load(&self, key: &str) -> Result<Vec<Template>, TemplateError>;

    /// Replace the full template list stored under `key`.
    async fn save(&self, key: &str, templates: &[Template]) -> Result<(), TemplateError>;
}
