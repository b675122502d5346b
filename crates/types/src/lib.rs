//! Shared data model for the Sprout recipe builder.
//!
//! These types cross every crate boundary in the workspace: the registry loads
//! [`Entity`] values into catalogs, the engine assembles a [`RecipeDocument`]
//! from picker and form state, and the CLI/TUI render both.

pub mod entity;
pub mod recipe;
pub mod variables;

pub use entity::{DuplicatePolicy, Entity, EntityKind, ParseEntityKindError};
pub use recipe::{CycleRecord, EnvironmentSection, FieldValue, PhaseSection, RecipeDescription, RecipeDocument};
pub use variables::{InputKind, VariableCatalog, VariableKind};
