//! Hierarchical drill-down over the margin-analytics tables.
//!
//! A small state machine over products → segments → transactions. The
//! level is a tagged union carrying its own context, so a deep level
//! without a parent selection is unrepresentable. Every transition is
//! backed by a server fetch; a failed fetch leaves level and rows
//! untouched. Row sets are always re-fetched on drill-up, never cached.

use tracing::{debug, info};

use crate::error::DrillDownError;
use crate::traits::backend::{AnalyticsRow, AnalyticsSource};

/// A selected row, reduced to the fields that key deeper fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: String,
    pub label: String,
}

/// Current drill-down position with its selection context.
#[derive(Debug, Clone, PartialEq)]
pub enum DrillLevel {
    /// The full product list.
    Root,
    /// Segments of one product.
    Child { parent: Entity },
    /// Transactions of one product segment.
    Grandchild { parent: Entity, child: Entity },
}

impl DrillLevel {
    pub fn depth(&self) -> usize {
        match self {
            Self::Root => 0,
            Self::Child { .. } => 1,
            Self::Grandchild { .. } => 2,
        }
    }
}

/// Reversible breadcrumb navigation over a three-level hierarchy.
///
/// `&mut self` receivers serialize fetches per navigator instance, so
/// overlapping drill operations cannot happen on one navigator.
pub struct DrillDownNavigator<S: AnalyticsSource> {
    source: S,
    level: DrillLevel,
    rows: Vec<AnalyticsRow>,
}

impl<S: AnalyticsSource> DrillDownNavigator<S> {
    /// Create a navigator at the root level with no rows loaded yet.
    /// Call [`reset`](Self::reset) to fetch the product list.
    pub fn new(source: S) -> Self {
        Self {
            source,
            level: DrillLevel::Root,
            rows: Vec::new(),
        }
    }

    /// Load (or reload) the root product list and clear all context.
    pub async fn reset(&mut self) -> Result<(), DrillDownError> {
        let rows = self.source.products().await?;
        info!(rows = rows.len(), "loaded product list");
        self.rows = rows;
        self.level = DrillLevel::Root;
        Ok(())
    }

    pub fn rows(&self) -> &[AnalyticsRow] {
        &self.rows
    }

    pub fn level(&self) -> &DrillLevel {
        &self.level
    }

    pub fn depth(&self) -> usize {
        self.level.depth()
    }

    /// Narrow into the selected row. Valid below the deepest level.
    pub async fn drill_down(&mut self, selected: &AnalyticsRow) -> Result<(), DrillDownError> {
        match self.level.clone() {
            DrillLevel::Root => {
                let parent = entity_from(selected, "id", "name")?;
                let rows = self.source.segments(&parent.id).await?;
                debug!(product = %parent.label, rows = rows.len(), "drilled into segments");
                self.rows = rows;
                self.level = DrillLevel::Child { parent };
            }
            DrillLevel::Child { parent } => {
                let child = entity_from(selected, "segment", "segment")?;
                let rows = self
                    .source
                    .transactions(&parent.id, &child.label)
                    .await?;
                debug!(
                    product = %parent.label,
                    segment = %child.label,
                    rows = rows.len(),
                    "drilled into transactions"
                );
                self.rows = rows;
                self.level = DrillLevel::Grandchild { parent, child };
            }
            DrillLevel::Grandchild { .. } => return Err(DrillDownError::AtMaxDepth),
        }
        Ok(())
    }

    /// Return to a shallower level, re-fetching its row set and
    /// discarding context at and above the target.
    pub async fn drill_up(&mut self, target_depth: usize) -> Result<(), DrillDownError> {
        let current = self.depth();
        if target_depth >= current {
            return Err(DrillDownError::InvalidTarget {
                target: target_depth,
                current,
            });
        }
        match (target_depth, self.level.clone()) {
            (0, _) => self.reset().await?,
            (1, DrillLevel::Grandchild { parent, .. }) => {
                let rows = self.source.segments(&parent.id).await?;
                self.rows = rows;
                self.level = DrillLevel::Child { parent };
            }
            (target, _) => {
                return Err(DrillDownError::InvalidTarget {
                    target,
                    current,
                })
            }
        }
        Ok(())
    }

    /// Breadcrumb labels, derived from the current level at read time.
    pub fn breadcrumbs(&self) -> Vec<String> {
        let mut crumbs = vec!["All Products".to_string()];
        match &self.level {
            DrillLevel::Root => {}
            DrillLevel::Child { parent } => crumbs.push(parent.label.clone()),
            DrillLevel::Grandchild { parent, child } => {
                crumbs.push(parent.label.clone());
                crumbs.push(child.label.clone());
            }
        }
        crumbs
    }
}

/// Pull the keying fields out of a selected row. The id field is
/// mandatory; the label falls back to the id when absent.
fn entity_from(
    row: &AnalyticsRow,
    id_field: &str,
    label_field: &str,
) -> Result<Entity, DrillDownError> {
    let id = field_string(row, id_field).ok_or_else(|| DrillDownError::MissingField {
        field: id_field.to_string(),
    })?;
    let label = field_string(row, label_field).unwrap_or_else(|| id.clone());
    Ok(Entity { id, label })
}

fn field_string(row: &AnalyticsRow, key: &str) -> Option<String> {
    match row.get(key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
