//! Schema-driven serialization of the nested form sections.
//!
//! Fields are enumerated from the [`FormSchema`], never from the form values
//! themselves, so adding a variable or a cycle input is a configuration
//! change only. Numeric inputs are coerced with [`parse_int_prefix`]; a value
//! that yields no integer becomes [`FieldValue::NotANumber`] and is reported as
//! a [`FieldIssue`]. Issues never abort serialization.

use std::fmt;

use sprout_types::{CycleRecord, EnvironmentSection, FieldValue, InputKind, PhaseSection};
use sprout_util::parse_int_prefix;
use thiserror::Error;
use tracing::warn;

use crate::form::{EnvironmentForm, FormSchema, PhaseForm};

/// A numeric field whose text could not be read as an integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: `{raw}` is not a number")]
pub struct FieldIssue {
    /// Location in the output document, e.g. `phases[0].cycles[1].duration_hours`.
    pub path: FieldPath,
    pub raw: String,
}

/// Dotted/indexed location of a field in the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    fn root(section: &str, index: usize) -> Self {
        Self(format!("{section}[{index}]"))
    }

    fn nested(&self, section: &str, index: usize) -> Self {
        Self(format!("{}.{section}[{index}]", self.0))
    }

    fn field(&self, name: &str) -> Self {
        Self(format!("{}.{name}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final field name.
    pub fn field_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialized output together with the issues found while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serialized<T> {
    pub value: T,
    pub issues: Vec<FieldIssue>,
}

impl<T> Serialized<T> {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Coerces raw input text according to the declared input kind.
pub fn coerce(kind: InputKind, raw: &str) -> FieldValue {
    if !kind.is_numeric() {
        return FieldValue::Text(raw.to_string());
    }
    match parse_int_prefix(raw) {
        Some(value) => FieldValue::Integer(value),
        None => FieldValue::NotANumber { raw: raw.to_string() },
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NestedFormSerializer<'a> {
    schema: &'a FormSchema,
}

impl<'a> NestedFormSerializer<'a> {
    pub fn new(schema: &'a FormSchema) -> Self {
        Self { schema }
    }

    /// Serializes every phase in form order.
    ///
    /// `name` and `repeat` are always present; `repeat` is coerced only when
    /// the schema declares it numeric. Cycle fields follow the schema order.
    pub fn serialize_phases(&self, phases: &[PhaseForm]) -> Serialized<Vec<PhaseSection>> {
        let mut issues = Vec::new();
        let value = phases
            .iter()
            .enumerate()
            .map(|(phase_index, phase)| {
                let phase_path = FieldPath::root("phases", phase_index);
                let repeat = self.read(&phase_path.field("repeat"), self.schema.repeat_kind, &phase.repeat, &mut issues);
                let cycles = phase
                    .cycles
                    .iter()
                    .enumerate()
                    .map(|(cycle_index, cycle)| {
                        let cycle_path = phase_path.nested("cycles", cycle_index);
                        self.schema
                            .cycle_fields
                            .iter()
                            .map(|spec| {
                                let raw = cycle.value(&spec.name).unwrap_or_default();
                                let value = self.read(&cycle_path.field(&spec.name), spec.kind, raw, &mut issues);
                                (spec.name.clone(), value)
                            })
                            .collect::<CycleRecord>()
                    })
                    .collect();

                PhaseSection {
                    name: FieldValue::Text(phase.name.clone()),
                    repeat,
                    cycles,
                }
            })
            .collect();

        Serialized { value, issues }
    }

    /// Serializes every environment in form order: `name` followed by each
    /// configured variable.
    pub fn serialize_environments(&self, environments: &[EnvironmentForm]) -> Serialized<Vec<EnvironmentSection>> {
        let fields = self.schema.environment_fields();
        let mut issues = Vec::new();
        let value = environments
            .iter()
            .enumerate()
            .map(|(index, environment)| {
                let path = FieldPath::root("environments", index);
                fields
                    .iter()
                    .map(|spec| {
                        let raw = environment.value(&spec.name).unwrap_or_default();
                        let value = self.read(&path.field(&spec.name), spec.kind, raw, &mut issues);
                        (spec.name.clone(), value)
                    })
                    .collect::<EnvironmentSection>()
            })
            .collect();

        Serialized { value, issues }
    }

    fn read(&self, path: &FieldPath, kind: InputKind, raw: &str, issues: &mut Vec<FieldIssue>) -> FieldValue {
        let value = coerce(kind, raw);
        if value.is_not_a_number() {
            warn!(%path, raw, "numeric field is not a number");
            issues.push(FieldIssue {
                path: path.clone(),
                raw: raw.to_string(),
            });
        }
        value
    }
}
