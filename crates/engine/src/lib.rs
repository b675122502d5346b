//! # Sprout Engine
//!
//! The state behind the recipe builder: entity pickers, the editable recipe
//! form, and the serialization that turns both into a [`RecipeDocument`].
//!
//! ## Usage
//!
//! ```rust
//! use sprout_engine::{FormSchema, RecipeSession};
//! use sprout_registry::{CatalogSet, EntityCatalog};
//! use sprout_types::{DuplicatePolicy, Entity, EntityKind};
//!
//! let catalogs = CatalogSet::from_catalogs(
//!     EntityCatalog::from_entities(EntityKind::Cultivar, [Entity::new("u1", "Scarlet Kale", "Frilly")]),
//!     EntityCatalog::from_entities(EntityKind::CultivationMethod, Vec::<Entity>::new()),
//! );
//! let mut session = RecipeSession::new(&catalogs, FormSchema::default(), DuplicatePolicy::Allow);
//!
//! session.cultivars.on_search_input("kale");
//! let first = session.cultivars.results()[0].id.clone();
//! session.cultivars.on_add(&first);
//!
//! let assembled = session.build_document()?;
//! assert_eq!(assembled.document.cultivars[0].name, "Scarlet Kale");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`selection`**: ordered selection rows addressed by [`RowToken`]
//! - **`picker`**: search, detail, add and remove handlers for one catalog
//! - **`form`**: schema-declared environments, phases and cycles
//! - **`serializer`**: schema-driven output with numeric coercion
//! - **`document`**: [`RecipeSession`] and final assembly
//! - **`draft`**: replaying a YAML draft through the session
//! - **`submit`**: where finished documents are written
//!
//! [`RecipeDocument`]: sprout_types::RecipeDocument

pub mod document;
pub mod draft;
pub mod form;
pub mod picker;
pub mod selection;
pub mod serializer;
pub mod submit;

pub use document::{AssembledDocument, BuildError, RecipeSession};
pub use draft::{DraftError, DraftReport, DraftScalar, PhaseDraft, RecipeDraft, load_draft_from_file};
pub use form::{CycleForm, EnvironmentForm, FieldSpec, FormError, FormSchema, PhaseForm, RecipeDetails, RecipeForm, UNNAMED_ENVIRONMENT, UnlistedEnvironment};
pub use picker::{DetailPanel, EntityPicker, PickerPhase, ResultRow, StaleSelection};
pub use selection::{RowToken, SelectedRow, SelectionSet};
pub use serializer::{FieldIssue, FieldPath, NestedFormSerializer, Serialized, coerce};
pub use submit::{JsonFileSubmission, JsonWriterSubmission, SubmitError, Submission};
