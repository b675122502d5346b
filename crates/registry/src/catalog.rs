//! The universe of selectable entities for one [`EntityKind`].
//!
//! A catalog is built once from raw records and never mutated afterwards.
//! Pickers hold it behind an `Arc`; reloading means building a fresh catalog
//! and handing the new handle to the picker.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use sprout_types::{Entity, EntityKind};
use sprout_util::contains_ignore_case;
use thiserror::Error;
use tracing::{debug, warn};

use crate::normalize::normalize_record;

/// Per-record failures reported while loading a catalog.
///
/// A rejected record never aborts the load; the remaining records are still
/// indexed and the rejects are returned alongside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A required field was missing or was not a string.
    #[error("{kind} record {index} is missing required field `{field}`")]
    MalformedEntity { kind: EntityKind, index: usize, field: String },
    /// The record itself was not a JSON object.
    #[error("{kind} record {index} is not an object")]
    NotAnObject { kind: EntityKind, index: usize },
}

/// Result of [`EntityCatalog::load`].
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub catalog: EntityCatalog,
    pub rejected: Vec<CatalogError>,
}

impl CatalogLoad {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Ordered mapping of entity id to entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCatalog {
    kind: EntityKind,
    entities: IndexMap<String, Entity>,
}

impl EntityCatalog {
    /// Normalizes and indexes raw records.
    ///
    /// Records are indexed in source order. When two records share an id the
    /// later one replaces the earlier one but keeps its position.
    pub fn load(kind: EntityKind, records: &[JsonValue]) -> CatalogLoad {
        let mut entities = IndexMap::with_capacity(records.len());
        let mut rejected = Vec::new();

        for (index, record) in records.iter().enumerate() {
            match normalize_record(kind, index, record) {
                Ok(entity) => {
                    if let Some(previous) = entities.insert(entity.id.clone(), entity) {
                        warn!(%kind, id = %previous.id, index, "duplicate entity id; later record replaces earlier one");
                    }
                }
                Err(error) => {
                    warn!(%kind, %error, "rejected catalog record");
                    rejected.push(error);
                }
            }
        }

        debug!(%kind, loaded = entities.len(), rejected = rejected.len(), "catalog loaded");
        CatalogLoad {
            catalog: EntityCatalog { kind, entities },
            rejected,
        }
    }

    /// Builds a catalog from entities that are already in canonical shape.
    pub fn from_entities(kind: EntityKind, entities: impl IntoIterator<Item = Entity>) -> Self {
        let entities = entities.into_iter().map(|entity| (entity.id.clone(), entity)).collect();
        Self { kind, entities }
    }

    /// Returns a new catalog holding only the entities accepted by `keep`.
    pub fn filtered(&self, mut keep: impl FnMut(&Entity) -> bool) -> Self {
        let entities = self
            .entities
            .iter()
            .filter(|(_, entity)| keep(entity))
            .map(|(id, entity)| (id.clone(), entity.clone()))
            .collect();
        Self { kind: self.kind, entities }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Looks up an entity by id. A miss is an ordinary outcome.
    pub fn lookup(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Case-insensitive substring search over entity names, in catalog order.
    ///
    /// An empty query matches every entity.
    pub fn search(&self, query: &str) -> Vec<&Entity> {
        self.entities
            .values()
            .filter(|entity| contains_ignore_case(&entity.name, query))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
