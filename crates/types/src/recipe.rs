//! The assembled recipe document and its nested sections.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Entity;

/// A single serialized form value.
///
/// `NotANumber` marks a numeric field whose text could not be read as an
/// integer. JSON has no NaN, so it serializes as `null`; whoever produced it
/// is expected to report the field alongside the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    NotANumber { raw: String },
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_not_a_number(&self) -> bool {
        matches!(self, FieldValue::NotANumber { .. })
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(text) => serializer.serialize_str(text),
            FieldValue::Integer(value) => serializer.serialize_i64(*value),
            FieldValue::NotANumber { .. } => serializer.serialize_none(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarRepr {
    Integer(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<ScalarRepr>::deserialize(deserializer)? {
            Some(ScalarRepr::Integer(value)) => FieldValue::Integer(value),
            Some(ScalarRepr::Text(text)) => FieldValue::Text(text),
            None => FieldValue::NotANumber { raw: String::new() },
        })
    }
}

/// One cycle row inside a phase, keyed by field name in schema order.
pub type CycleRecord = IndexMap<String, FieldValue>;

/// One environment, keyed by field name (`name` first, then variables).
pub type EnvironmentSection = IndexMap<String, FieldValue>;

/// A named, repeatable schedule segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSection {
    pub name: FieldValue,
    pub repeat: FieldValue,
    #[serde(default)]
    pub cycles: Vec<CycleRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDescription {
    pub brief: String,
    pub verbose: String,
}

/// The finished artifact handed to the submission collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDocument {
    pub name: String,
    pub description: RecipeDescription,
    pub cultivars: Vec<Entity>,
    pub cultivation_methods: Vec<Entity>,
    pub environments: Vec<EnvironmentSection>,
    pub phases: Vec<PhaseSection>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn not_a_number_serializes_as_null() {
        let mut cycle = CycleRecord::new();
        cycle.insert("name".into(), FieldValue::text("Light"));
        cycle.insert("duration_hours".into(), FieldValue::NotANumber { raw: "twelve".into() });
        assert_eq!(
            serde_json::to_value(&cycle).unwrap(),
            json!({"name": "Light", "duration_hours": null})
        );
    }

    #[test]
    fn document_uses_camel_case_keys() {
        let document = RecipeDocument {
            name: "Kale".into(),
            description: RecipeDescription::default(),
            cultivars: Vec::new(),
            cultivation_methods: Vec::new(),
            environments: Vec::new(),
            phases: vec![PhaseSection {
                name: FieldValue::text("Veg"),
                repeat: FieldValue::text("3"),
                cycles: Vec::new(),
            }],
        };
        let value = serde_json::to_value(&document).unwrap();
        assert!(value.get("cultivationMethods").is_some());
        assert_eq!(value["phases"][0], json!({"name": "Veg", "repeat": "3", "cycles": []}));
    }

    #[test]
    fn field_values_read_back_from_yaml() {
        let section: EnvironmentSection = serde_yaml::from_str("name: Tent1\nair_temperature_celsius: 22\n").unwrap();
        assert_eq!(section["name"], FieldValue::text("Tent1"));
        assert_eq!(section["air_temperature_celsius"], FieldValue::Integer(22));
    }
}
