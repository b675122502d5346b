//! Registry crate for the Sprout recipe builder's selectable entities.
//!
//! This crate owns the catalogs that pickers search and select from: loading
//! raw records from a data source, normalizing them per entity kind, and
//! indexing them by id. It also carries the builder's user configuration.

pub mod catalog;
pub mod catalog_set;
pub mod config;
pub mod normalize;
pub mod source;

pub use catalog::{CatalogError, CatalogLoad, EntityCatalog};
pub use catalog_set::CatalogSet;
pub use config::{BuilderConfig, ConfigError, default_config_path, sprout_config_dir};
pub use source::{EntitySource, FileEntitySource, SourceError, StaticEntitySource};
