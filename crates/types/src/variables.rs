//! Environment variable catalog.
//!
//! The set of per-environment control variables is configuration, not code:
//! the form schema and the serializer enumerate whatever this catalog holds.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Declared type of an environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// Free-form list text (kept verbatim).
    List,
    /// Integer value; coerced on serialization.
    Int,
}

impl VariableKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, VariableKind::Int)
    }

    /// The form input kind used to edit a variable of this type.
    pub fn input_kind(self) -> InputKind {
        match self {
            VariableKind::List => InputKind::Text,
            VariableKind::Int => InputKind::Numeric,
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VariableKind::List => "list",
            VariableKind::Int => "int",
        })
    }
}

/// Declared kind of a form input. Only `Numeric` inputs are coerced to integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    #[default]
    Text,
    Numeric,
    /// A choice among options supplied at render time (e.g. environment names).
    Select,
}

impl InputKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, InputKind::Numeric)
    }
}

/// Ordered mapping of variable name to declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableCatalog(IndexMap<String, VariableKind>);

impl Default for VariableCatalog {
    fn default() -> Self {
        Self::from_pairs([
            ("light_spectrum_taurus", VariableKind::List),
            ("light_intensity_par", VariableKind::Int),
            ("air_temperature_celsius", VariableKind::Int),
        ])
    }
}

impl VariableCatalog {
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, VariableKind)>,
        K: Into<String>,
    {
        Self(pairs.into_iter().map(|(name, kind)| (name.into(), kind)).collect())
    }

    pub fn get(&self, name: &str) -> Option<VariableKind> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, VariableKind)> {
        self.0.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_keeps_declaration_order() {
        let catalog = VariableCatalog::default();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["light_spectrum_taurus", "light_intensity_par", "air_temperature_celsius"]);
        assert_eq!(catalog.get("light_intensity_par"), Some(VariableKind::Int));
    }

    #[test]
    fn catalog_reads_from_json_object() {
        let catalog: VariableCatalog = serde_json::from_str(r#"{"water_ph": "int", "notes": "list"}"#).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("water_ph").is_some_and(VariableKind::is_numeric));
        assert!(!catalog.get("notes").is_some_and(VariableKind::is_numeric));
    }
}
