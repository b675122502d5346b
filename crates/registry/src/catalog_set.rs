//! Loads every catalog the builder needs before any picker is constructed.
//!
//! Holding a `CatalogSet` is the readiness precondition for picker input:
//! the only way to obtain catalog handles is to await [`CatalogSet::initialize`].

use std::sync::Arc;

use sprout_types::EntityKind;
use tracing::info;

use crate::{
    catalog::{CatalogError, EntityCatalog},
    source::{EntitySource, SourceError},
};

/// Fully loaded catalogs, one per [`EntityKind`].
#[derive(Debug, Clone)]
pub struct CatalogSet {
    cultivars: Arc<EntityCatalog>,
    cultivation_methods: Arc<EntityCatalog>,
    rejected: Vec<CatalogError>,
}

impl CatalogSet {
    /// Fetches and loads both kinds concurrently.
    ///
    /// Transport failures abort initialization; malformed records do not and
    /// are collected in [`CatalogSet::rejected`].
    pub async fn initialize(source: &dyn EntitySource) -> Result<Self, SourceError> {
        let (cultivar_records, method_records) = tokio::try_join!(
            source.fetch(EntityKind::Cultivar),
            source.fetch(EntityKind::CultivationMethod)
        )?;

        let cultivars = EntityCatalog::load(EntityKind::Cultivar, &cultivar_records);
        let cultivation_methods = EntityCatalog::load(EntityKind::CultivationMethod, &method_records);

        let mut rejected = cultivars.rejected;
        rejected.extend(cultivation_methods.rejected);

        info!(
            cultivars = cultivars.catalog.len(),
            cultivation_methods = cultivation_methods.catalog.len(),
            rejected = rejected.len(),
            "catalogs ready"
        );

        Ok(Self {
            cultivars: Arc::new(cultivars.catalog),
            cultivation_methods: Arc::new(cultivation_methods.catalog),
            rejected,
        })
    }

    /// Assembles a set from catalogs built elsewhere.
    pub fn from_catalogs(cultivars: EntityCatalog, cultivation_methods: EntityCatalog) -> Self {
        Self {
            cultivars: Arc::new(cultivars),
            cultivation_methods: Arc::new(cultivation_methods),
            rejected: Vec::new(),
        }
    }

    pub fn cultivars(&self) -> Arc<EntityCatalog> {
        Arc::clone(&self.cultivars)
    }

    pub fn cultivation_methods(&self) -> Arc<EntityCatalog> {
        Arc::clone(&self.cultivation_methods)
    }

    pub fn get(&self, kind: EntityKind) -> Arc<EntityCatalog> {
        match kind {
            EntityKind::Cultivar => self.cultivars(),
            EntityKind::CultivationMethod => self.cultivation_methods(),
        }
    }

    /// Records rejected while loading, across both kinds.
    pub fn rejected(&self) -> &[CatalogError] {
        &self.rejected
    }
}
