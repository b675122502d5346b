//! Final assembly of the recipe document.

use sprout_registry::{BuilderConfig, CatalogSet};
use sprout_types::{DuplicatePolicy, EntityKind, RecipeDescription, RecipeDocument};
use thiserror::Error;
use tracing::info;

use crate::{
    form::{FormSchema, RecipeForm},
    picker::{EntityPicker, StaleSelection},
    serializer::{FieldIssue, NestedFormSerializer},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    StaleSelection(#[from] StaleSelection),
}

/// A built document plus the per-field issues the user must be shown.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledDocument {
    pub document: RecipeDocument,
    pub issues: Vec<FieldIssue>,
}

/// Everything needed to build one recipe: both pickers and the form.
#[derive(Debug, Clone)]
pub struct RecipeSession {
    pub cultivars: EntityPicker,
    pub cultivation_methods: EntityPicker,
    pub form: RecipeForm,
}

impl RecipeSession {
    pub fn new(catalogs: &CatalogSet, schema: FormSchema, policy: DuplicatePolicy) -> Self {
        Self {
            cultivars: EntityPicker::new(catalogs.cultivars(), policy),
            cultivation_methods: EntityPicker::new(catalogs.cultivation_methods(), policy),
            form: RecipeForm::new(schema),
        }
    }

    pub fn from_config(catalogs: &CatalogSet, config: &BuilderConfig) -> Self {
        Self::new(catalogs, FormSchema::from_config(config), config.duplicate_policy)
    }

    pub fn picker(&self, kind: EntityKind) -> &EntityPicker {
        match kind {
            EntityKind::Cultivar => &self.cultivars,
            EntityKind::CultivationMethod => &self.cultivation_methods,
        }
    }

    pub fn picker_mut(&mut self, kind: EntityKind) -> &mut EntityPicker {
        match kind {
            EntityKind::Cultivar => &mut self.cultivars,
            EntityKind::CultivationMethod => &mut self.cultivation_methods,
        }
    }

    /// Swaps both pickers over to freshly loaded catalogs.
    pub fn reload(&mut self, catalogs: &CatalogSet) {
        self.cultivars.replace_catalog(catalogs.cultivars());
        self.cultivation_methods.replace_catalog(catalogs.cultivation_methods());
    }

    /// Aggregates every section into one document.
    ///
    /// A stale picker selection aborts the build. Numeric fields that failed
    /// coercion do not; they are returned in [`AssembledDocument::issues`].
    /// Sections are not cross-checked against one another.
    pub fn build_document(&self) -> Result<AssembledDocument, BuildError> {
        let cultivars = self.cultivars.serialize()?;
        let cultivation_methods = self.cultivation_methods.serialize()?;

        let serializer = NestedFormSerializer::new(self.form.schema());
        let environments = serializer.serialize_environments(self.form.environments());
        let phases = serializer.serialize_phases(self.form.phases());

        let mut issues = environments.issues;
        issues.extend(phases.issues);

        let details = &self.form.details;
        let document = RecipeDocument {
            name: details.name.clone(),
            description: RecipeDescription {
                brief: details.brief_description.clone(),
                verbose: details.verbose_description.clone(),
            },
            cultivars,
            cultivation_methods,
            environments: environments.value,
            phases: phases.value,
        };

        info!(
            cultivars = document.cultivars.len(),
            cultivation_methods = document.cultivation_methods.len(),
            environments = document.environments.len(),
            phases = document.phases.len(),
            issues = issues.len(),
            "recipe document assembled"
        );
        Ok(AssembledDocument { document, issues })
    }
}
