//! Editable recipe form state.
//!
//! Every section is created from a [`FormSchema`], so the set of fields a
//! section holds is declared up front rather than discovered from whatever a
//! view happened to render. Values are kept as the raw text the user typed;
//! coercion happens only at serialization time.

use std::fmt;

use indexmap::IndexMap;
use sprout_registry::BuilderConfig;
use sprout_types::{InputKind, VariableCatalog};
use thiserror::Error;

/// Label shown for an environment whose name has not been filled in yet.
pub const UNNAMED_ENVIRONMENT: &str = "New Environment";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{section} has no field named `{field}`")]
    UnknownField { section: String, field: String },
    #[error("phase {0} does not exist")]
    NoSuchPhase(usize),
    #[error("phase {phase} has no cycle {cycle}")]
    NoSuchCycle { phase: usize, cycle: usize },
    #[error("environment {0} does not exist")]
    NoSuchEnvironment(usize),
}

/// A cycle whose `environment` value is not one of the form's environment
/// names. Reported for information only; the document still builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlistedEnvironment {
    pub phase: usize,
    pub cycle: usize,
    pub environment: String,
}

impl fmt::Display for UnlistedEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "phases[{}].cycles[{}].environment '{}' is not one of the recipe's environments",
            self.phase, self.cycle, self.environment
        )
    }
}

/// A declared form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: InputKind,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: InputKind) -> Self {
        Self { name: name.into(), kind }
    }
}

/// Declared shape of every dynamic form section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    /// Kind of the phase-level `repeat` input.
    pub repeat_kind: InputKind,
    /// Inputs present on every cycle row, in output order.
    pub cycle_fields: Vec<FieldSpec>,
    /// Variables present on every environment after its `name`.
    pub variables: VariableCatalog,
}

impl Default for FormSchema {
    fn default() -> Self {
        Self {
            repeat_kind: InputKind::Text,
            cycle_fields: vec![
                FieldSpec::new("name", InputKind::Text),
                FieldSpec::new("environment", InputKind::Select),
                FieldSpec::new("duration_hours", InputKind::Numeric),
            ],
            variables: VariableCatalog::default(),
        }
    }
}

impl FormSchema {
    pub fn from_config(config: &BuilderConfig) -> Self {
        Self {
            repeat_kind: config.repeat_kind,
            variables: config.variables.clone(),
            ..Self::default()
        }
    }

    /// Inputs present on every environment: `name` then each variable.
    pub fn environment_fields(&self) -> Vec<FieldSpec> {
        std::iter::once(FieldSpec::new("name", InputKind::Text))
            .chain(self.variables.iter().map(|(name, kind)| FieldSpec::new(name, kind.input_kind())))
            .collect()
    }

    fn blank_values(fields: &[FieldSpec]) -> IndexMap<String, String> {
        fields.iter().map(|field| (field.name.clone(), String::new())).collect()
    }
}

/// Raw values for one cycle row, keyed by declared field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleForm {
    values: IndexMap<String, String>,
}

impl CycleForm {
    pub fn new(schema: &FormSchema) -> Self {
        Self {
            values: FormSchema::blank_values(&schema.cycle_fields),
        }
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        set_declared(&mut self.values, "cycle", field, value.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhaseForm {
    pub name: String,
    pub repeat: String,
    pub cycles: Vec<CycleForm>,
}

impl PhaseForm {
    pub fn add_cycle(&mut self, schema: &FormSchema) -> usize {
        self.cycles.push(CycleForm::new(schema));
        self.cycles.len() - 1
    }
}

/// Raw values for one environment, keyed by declared field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentForm {
    values: IndexMap<String, String>,
}

impl EnvironmentForm {
    pub fn new(schema: &FormSchema) -> Self {
        Self {
            values: FormSchema::blank_values(&schema.environment_fields()),
        }
    }

    pub fn name(&self) -> &str {
        self.value("name").unwrap_or_default()
    }

    /// Name to show in headers and environment selects.
    pub fn display_name(&self) -> &str {
        let name = self.name().trim();
        if name.is_empty() { UNNAMED_ENVIRONMENT } else { name }
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        set_declared(&mut self.values, "environment", field, value.into())
    }
}

fn set_declared(values: &mut IndexMap<String, String>, section: &str, field: &str, value: String) -> Result<(), FormError> {
    match values.get_mut(field) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(FormError::UnknownField {
            section: section.to_string(),
            field: field.to_string(),
        }),
    }
}

/// Scalar recipe details.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeDetails {
    pub name: String,
    pub brief_description: String,
    pub verbose_description: String,
}

/// The whole editable form: details, environments and phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeForm {
    schema: FormSchema,
    pub details: RecipeDetails,
    environments: Vec<EnvironmentForm>,
    phases: Vec<PhaseForm>,
}

impl RecipeForm {
    pub fn new(schema: FormSchema) -> Self {
        Self {
            schema,
            details: RecipeDetails::default(),
            environments: Vec::new(),
            phases: Vec::new(),
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn environments(&self) -> &[EnvironmentForm] {
        &self.environments
    }

    pub fn phases(&self) -> &[PhaseForm] {
        &self.phases
    }

    /// Appends a blank environment and returns its index.
    pub fn add_environment(&mut self) -> usize {
        self.environments.push(EnvironmentForm::new(&self.schema));
        self.environments.len() - 1
    }

    /// Removes an environment. Cycles that referenced it by name keep the
    /// stale name; no cross-section checks are made.
    pub fn remove_environment(&mut self, index: usize) -> Result<EnvironmentForm, FormError> {
        if index >= self.environments.len() {
            return Err(FormError::NoSuchEnvironment(index));
        }
        Ok(self.environments.remove(index))
    }

    pub fn environment_mut(&mut self, index: usize) -> Result<&mut EnvironmentForm, FormError> {
        self.environments.get_mut(index).ok_or(FormError::NoSuchEnvironment(index))
    }

    /// Options offered by every cycle's environment select, in environment order.
    pub fn environment_names(&self) -> Vec<&str> {
        self.environments.iter().map(EnvironmentForm::display_name).collect()
    }

    /// Cycles whose filled-in `environment` is missing from [`Self::environment_names`].
    pub fn unlisted_cycle_environments(&self) -> Vec<UnlistedEnvironment> {
        let options = self.environment_names();
        self.phases
            .iter()
            .enumerate()
            .flat_map(|(phase, form)| form.cycles.iter().enumerate().map(move |(cycle, row)| (phase, cycle, row)))
            .filter_map(|(phase, cycle, row)| {
                let environment = row.value("environment").unwrap_or_default();
                (!environment.is_empty() && !options.contains(&environment)).then(|| UnlistedEnvironment {
                    phase,
                    cycle,
                    environment: environment.to_string(),
                })
            })
            .collect()
    }

    /// Appends a blank phase and returns its index.
    pub fn add_phase(&mut self) -> usize {
        self.phases.push(PhaseForm::default());
        self.phases.len() - 1
    }

    pub fn remove_phase(&mut self, index: usize) -> Result<PhaseForm, FormError> {
        if index >= self.phases.len() {
            return Err(FormError::NoSuchPhase(index));
        }
        Ok(self.phases.remove(index))
    }

    pub fn phase_mut(&mut self, index: usize) -> Result<&mut PhaseForm, FormError> {
        self.phases.get_mut(index).ok_or(FormError::NoSuchPhase(index))
    }

    /// Appends a blank cycle to a phase and returns the cycle's index.
    pub fn add_cycle(&mut self, phase: usize) -> Result<usize, FormError> {
        let schema = &self.schema;
        let phase_form = self.phases.get_mut(phase).ok_or(FormError::NoSuchPhase(phase))?;
        Ok(phase_form.add_cycle(schema))
    }

    pub fn remove_cycle(&mut self, phase: usize, cycle: usize) -> Result<CycleForm, FormError> {
        let phase_form = self.phases.get_mut(phase).ok_or(FormError::NoSuchPhase(phase))?;
        if cycle >= phase_form.cycles.len() {
            return Err(FormError::NoSuchCycle { phase, cycle });
        }
        Ok(phase_form.cycles.remove(cycle))
    }

    pub fn cycle_mut(&mut self, phase: usize, cycle: usize) -> Result<&mut CycleForm, FormError> {
        let phase_form = self.phases.get_mut(phase).ok_or(FormError::NoSuchPhase(phase))?;
        phase_form.cycles.get_mut(cycle).ok_or(FormError::NoSuchCycle { phase, cycle })
    }
}
