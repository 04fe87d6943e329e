//! In-memory template store for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::TemplateError;
use crate::traits::store::TemplateStore;
use crate::types::template::Template;

/// In-memory key-value store for template lists.
///
/// Useful for testing and development. Not suitable for production as
/// data is lost on restart.
#[derive(Default)]
pub struct MemoryTemplateStore {
    lists: RwLock<HashMap<String, Vec<Template>>>,
}

impl MemoryTemplateStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored lists.
    pub fn clear(&self) {
        self.lists.write().unwrap().clear();
    }

    /// Number of templates stored under `key`.
    pub fn count(&self, key: &str) -> usize {
        self.lists
            .read()
            .unwrap()
            .get(key)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn load(&self, key: &str) -> Result<Vec<Template>, TemplateError> {
        Ok(self
            .lists
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, key: &str, templates: &[Template]) -> Result<(), TemplateError> {
        self.lists
            .write()
            .unwrap()
            .insert(key.to_string(), templates.to_vec());
        Ok(())
    }
}
