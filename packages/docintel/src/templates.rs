//! Template repository: built-in merge plus persisted user templates.
//!
//! The repository owns the persisted list through an injected
//! [`TemplateStore`]; callers hold a repository reference, never a
//! shared singleton. Every mutation is a full read-modify-write of the
//! list. Built-in templates are synthesized once, on the first load
//! that finds none, and are immutable afterwards.

use tracing::info;
use uuid::Uuid;

use crate::error::TemplateError;
use crate::pipeline::columns::schema_to_columns;
use crate::traits::store::TemplateStore;
use crate::types::schema::{ItemsSchema, Schema};
use crate::types::template::{ColumnDefinition, Template};

/// Default storage key for the template list.
pub const TEMPLATE_STORE_KEY: &str = "extraction_templates";

/// Schemas the backend ships with; expanded into built-in templates at
/// first load.
fn builtin_schemas() -> Vec<Schema> {
    vec![
        Schema {
            name: "Invoice".to_string(),
            description: "Standard vendor invoice".to_string(),
            required_fields: vec![
                "invoice_number".to_string(),
                "invoice_date".to_string(),
                "vendor_name".to_string(),
                "total".to_string(),
            ],
            optional_fields: vec![
                "subtotal".to_string(),
                "tax".to_string(),
                "notes".to_string(),
            ],
            items_schema: ItemsSchema {
                required: vec!["description".to_string(), "quantity".to_string()],
                optional: vec!["unit_price".to_string(), "line_total".to_string()],
            },
            auto_detect: false,
        },
        Schema {
            name: "Purchase Order".to_string(),
            description: "Outbound purchase order".to_string(),
            required_fields: vec![
                "po_number".to_string(),
                "order_date".to_string(),
                "supplier".to_string(),
            ],
            optional_fields: vec!["freight".to_string(), "discount".to_string()],
            items_schema: ItemsSchema {
                required: vec!["item_code".to_string(), "quantity".to_string()],
                optional: vec!["unit_price".to_string()],
            },
            auto_detect: false,
        },
    ]
}

fn builtin_templates() -> Vec<Template> {
    builtin_schemas()
        .into_iter()
        .map(|schema| {
            let columns = schema_to_columns(&schema);
            Template::builtin(schema.name.clone(), schema.description.clone(), columns)
        })
        .collect()
}

/// Repository over the persisted template list.
pub struct TemplateRepository<S: TemplateStore> {
    store: S,
    key: String,
}

impl<S: TemplateStore> TemplateRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: TEMPLATE_STORE_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// The full template list, built-ins first.
    ///
    /// On the first load that finds no built-ins, they are synthesized
    /// from the built-in schemas and persisted alongside the user list,
    /// so their ids stay stable across sessions.
    pub async fn list(&self) -> Result<Vec<Template>, TemplateError> {
        let stored = self.store.load(&self.key).await?;
        if stored.iter().any(Template::is_builtin) {
            return Ok(stored);
        }
        let mut merged = builtin_templates();
        info!(count = merged.len(), "seeding built-in templates");
        merged.extend(stored);
        self.store.save(&self.key, &merged).await?;
        Ok(merged)
    }

    pub async fn get(&self, id: Uuid) -> Result<Template, TemplateError> {
        self.list()
            .await?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(TemplateError::NotFound { id })
    }

    /// Insert or replace a user template and persist the full list.
    pub async fn save_template(&self, template: Template) -> Result<(), TemplateError> {
        let mut templates = self.list().await?;
        match templates.iter().position(|t| t.id == template.id) {
            Some(index) if templates[index].is_builtin() => {
                return Err(TemplateError::BuiltinImmutable { id: template.id })
            }
            Some(index) => templates[index] = template,
            None => templates.push(template),
        }
        self.store.save(&self.key, &templates).await
    }

    /// Delete a user template and persist the full list.
    pub async fn delete_template(&self, id: Uuid) -> Result<(), TemplateError> {
        let mut templates = self.list().await?;
        let index = templates
            .iter()
            .position(|t| t.id == id)
            .ok_or(TemplateError::NotFound { id })?;
        if templates[index].is_builtin() {
            return Err(TemplateError::BuiltinImmutable { id });
        }
        templates.remove(index);
        self.store.save(&self.key, &templates).await
    }

    /// Append a column to a user template and persist.
    pub async fn add_column(
        &self,
        id: Uuid,
        column: ColumnDefinition,
    ) -> Result<(), TemplateError> {
        self.mutate_columns(id, move |columns| {
            columns.push(column);
            Ok(())
        })
        .await
    }

    /// Replace the column named `name` and persist.
    pub async fn update_column(
        &self,
        id: Uuid,
        name: &str,
        column: ColumnDefinition,
    ) -> Result<(), TemplateError> {
        let name = name.to_string();
        self.mutate_columns(id, move |columns| {
            let index = columns
                .iter()
                .position(|c| c.name == name)
                .ok_or(TemplateError::ColumnNotFound { name })?;
            columns[index] = column;
            Ok(())
        })
        .await
    }

    /// Remove the column named `name` and persist.
    pub async fn delete_column(&self, id: Uuid, name: &str) -> Result<(), TemplateError> {
        let name = name.to_string();
        self.mutate_columns(id, move |columns| {
            let index = columns
                .iter()
                .position(|c| c.name == name)
                .ok_or(TemplateError::ColumnNotFound { name })?;
            columns.remove(index);
            Ok(())
        })
        .await
    }

    async fn mutate_columns<F>(&self, id: Uuid, mutate: F) -> Result<(), TemplateError>
    where
        F: FnOnce(&mut Vec<ColumnDefinition>) -> Result<(), TemplateError>,
    {
        let mut templates = self.list().await?;
        let index = templates
            .iter()
            .position(|t| t.id == id)
            .ok_or(TemplateError::NotFound { id })?;
        if templates[index].is_builtin() {
            return Err(TemplateError::BuiltinImmutable { id });
        }
        mutate(&mut templates[index].columns)?;
        self.store.save(&self.key, &templates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::memory::MemoryTemplateStore;
    use crate::traits::store::MockTemplateStore;
    use crate::types::template::{DataType, TemplateSource};

    #[tokio::test]
    async fn first_load_seeds_builtins_once_with_stable_ids() {
        let repo = TemplateRepository::new(MemoryTemplateStore::new());

        let first = repo.list().await.unwrap();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(Template::is_builtin));
        assert_eq!(first[0].name, "Invoice");
        // The invoice schema expands with inferred types.
        let invoice_total = first[0]
            .columns
            .iter()
            .find(|c| c.name == "Total")
            .unwrap();
        assert_eq!(invoice_total.data_type, DataType::Currency);

        let second = repo.list().await.unwrap();
        assert_eq!(second[0].id, first[0].id);
    }

    #[tokio::test]
    async fn save_and_delete_user_templates() {
        let repo = TemplateRepository::new(MemoryTemplateStore::new());
        let template = Template::new("Custom", "mine")
            .with_columns(vec![ColumnDefinition::new("Notes", DataType::Text)]);
        let id = template.id;

        repo.save_template(template).await.unwrap();
        let loaded = repo.get(id).await.unwrap();
        assert_eq!(loaded.source, TemplateSource::User);
        assert_eq!(loaded.columns.len(), 1);

        repo.delete_template(id).await.unwrap();
        assert!(matches!(
            repo.get(id).await,
            Err(TemplateError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn builtins_are_immutable() {
        let repo = TemplateRepository::new(MemoryTemplateStore::new());
        let builtin_id = repo.list().await.unwrap()[0].id;

        assert!(matches!(
            repo.delete_template(builtin_id).await,
            Err(TemplateError::BuiltinImmutable { .. })
        ));
        assert!(matches!(
            repo.add_column(builtin_id, ColumnDefinition::new("X", DataType::Text))
                .await,
            Err(TemplateError::BuiltinImmutable { .. })
        ));
    }

    #[tokio::test]
    async fn column_operations_persist_the_full_list() {
        let repo = TemplateRepository::new(MemoryTemplateStore::new());
        let template = Template::new("Custom", "");
        let id = template.id;
        repo.save_template(template).await.unwrap();

        repo.add_column(id, ColumnDefinition::new("Amount", DataType::Currency))
            .await
            .unwrap();
        repo.update_column(
            id,
            "Amount",
            ColumnDefinition::new("Amount", DataType::Currency).required(),
        )
        .await
        .unwrap();

        let loaded = repo.get(id).await.unwrap();
        assert_eq!(loaded.columns.len(), 1);
        assert!(loaded.columns[0].required);

        repo.delete_column(id, "Amount").await.unwrap();
        assert!(repo.get(id).await.unwrap().columns.is_empty());

        assert!(matches!(
            repo.delete_column(id, "Amount").await,
            Err(TemplateError::ColumnNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn every_mutation_writes_the_whole_list() {
        let mut store = MockTemplateStore::new();
        let template = Template::new("Custom", "");
        let id = template.id;
        let seeded = {
            let mut list = builtin_templates();
            list.push(template);
            list
        };

        let loaded = seeded.clone();
        store
            .expect_load()
            .returning(move |_| Ok(loaded.clone()));
        store
            .expect_save()
            .withf(move |key, templates| {
                // Full read-modify-write: built-ins ride along with the
                // mutated user template.
                key == TEMPLATE_STORE_KEY
                    && templates.len() == 3
                    && templates
                        .iter()
                        .any(|t| t.id == id && t.columns.len() == 1)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let repo = TemplateRepository::new(store);
        repo.add_column(id, ColumnDefinition::new("Amount", DataType::Currency))
            .await
            .unwrap();
    }
}
