//! Search / detail / add / remove state for one entity catalog.
//!
//! The picker is the state behind a picker view. Views call the `on_*`
//! handlers in response to input and render from the accessors; nothing here
//! depends on how the view draws itself.
//!
//! Two orthogonal pieces of state are tracked:
//!
//! - the search phase: [`PickerPhase::Idle`] until the first search input,
//!   [`PickerPhase::Searching`] from then on, even after the query is cleared;
//! - the optional [`DetailPanel`] for the last result the user focused.
//!
//! Selection rows reference entities by id only. [`EntityPicker::serialize`]
//! resolves them against the catalog again, so a row whose entity has since
//! disappeared is reported as [`StaleSelection`] instead of being dropped.

use std::sync::Arc;

use serde_json::{Map as JsonMap, Value as JsonValue};
use sprout_registry::EntityCatalog;
use sprout_types::{DuplicatePolicy, Entity, EntityKind};
use thiserror::Error;
use tracing::debug;

use crate::selection::{RowToken, SelectedRow, SelectionSet};

/// A selection row whose id no longer resolves in the picker's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("selected {kind} '{id}' is no longer in the catalog")]
pub struct StaleSelection {
    pub kind: EntityKind,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerPhase {
    #[default]
    Idle,
    Searching,
}

/// One row of the search results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub id: String,
}

/// Read-only copy of every field of the focused entity.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub id: String,
    pub fields: JsonMap<String, JsonValue>,
}

impl DetailPanel {
    fn from_entity(entity: &Entity) -> Self {
        Self {
            id: entity.id.clone(),
            fields: entity.fields().into_iter().collect(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&JsonValue> {
        self.fields.get(name)
    }
}

#[derive(Debug, Clone)]
pub struct EntityPicker {
    catalog: Arc<EntityCatalog>,
    query: String,
    phase: PickerPhase,
    results: Vec<ResultRow>,
    detail: Option<DetailPanel>,
    selection: SelectionSet,
}

impl EntityPicker {
    /// Builds a picker over an already loaded catalog.
    pub fn new(catalog: Arc<EntityCatalog>, policy: DuplicatePolicy) -> Self {
        Self {
            catalog,
            query: String::new(),
            phase: PickerPhase::Idle,
            results: Vec::new(),
            detail: None,
            selection: SelectionSet::new(policy),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.catalog.kind()
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> PickerPhase {
        self.phase
    }

    pub fn results(&self) -> &[ResultRow] {
        &self.results
    }

    pub fn detail(&self) -> Option<&DetailPanel> {
        self.detail.as_ref()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Resolves a result row to its entity, if it still exists.
    pub fn result_entity(&self, row: &ResultRow) -> Option<&Entity> {
        self.catalog.lookup(&row.id)
    }

    /// Resolves a selection row to its entity, if it still exists.
    pub fn selected_entity(&self, row: &SelectedRow) -> Option<&Entity> {
        self.catalog.lookup(&row.id)
    }

    /// Replaces the query, clears the result rows and the detail panel, then
    /// repopulates the rows from the catalog.
    ///
    /// Clearing the query lists the whole catalog.
    pub fn on_search_input(&mut self, query: &str) {
        self.query = query.to_string();
        self.results.clear();
        self.detail = None;
        self.phase = PickerPhase::Searching;
        self.results = self
            .catalog
            .search(query)
            .into_iter()
            .map(|entity| ResultRow { id: entity.id.clone() })
            .collect();
        debug!(kind = %self.kind(), query, results = self.results.len(), "picker search");
    }

    /// Shows every field of the entity in the detail panel, replacing whatever
    /// was shown before. Returns `false`, leaving the panel untouched, when the
    /// id does not resolve.
    pub fn on_result_selected(&mut self, id: &str) -> bool {
        let Some(entity) = self.catalog.lookup(id) else {
            debug!(kind = %self.kind(), id, "ignoring detail request for unknown entity");
            return false;
        };
        self.detail = Some(DetailPanel::from_entity(entity));
        true
    }

    /// Appends a selection row for the entity. Unknown ids and ids refused by
    /// the duplicate policy leave the selection unchanged.
    pub fn on_add(&mut self, id: &str) -> Option<RowToken> {
        if !self.catalog.contains(id) {
            debug!(kind = %self.kind(), id, "ignoring add for unknown entity");
            return None;
        }
        let token = self.selection.add(id);
        debug!(kind = %self.kind(), id, added = token.is_some(), "picker add");
        token
    }

    /// Removes exactly the row behind `token`; absent rows are a no-op.
    pub fn on_remove(&mut self, token: RowToken) -> bool {
        let removed = self.selection.remove(token).is_some();
        debug!(kind = %self.kind(), %token, removed, "picker remove");
        removed
    }

    /// Resolves every selection row, in display order.
    pub fn serialize(&self) -> Result<Vec<Entity>, StaleSelection> {
        self.selection
            .ids()
            .map(|id| {
                self.catalog.lookup(id).cloned().ok_or_else(|| StaleSelection {
                    kind: self.kind(),
                    id: id.to_string(),
                })
            })
            .collect()
    }

    /// Swaps in a freshly loaded catalog.
    ///
    /// The current query is re-run unless nothing was searched yet, and a
    /// detail panel whose entity vanished is cleared. Selection rows are kept
    /// as they are.
    pub fn replace_catalog(&mut self, catalog: Arc<EntityCatalog>) {
        self.catalog = catalog;
        if self.phase == PickerPhase::Idle {
            return;
        }
        let detail = self.detail.take();
        let query = std::mem::take(&mut self.query);
        self.on_search_input(&query);
        if let Some(detail) = detail {
            self.on_result_selected(&detail.id);
        }
    }
}
