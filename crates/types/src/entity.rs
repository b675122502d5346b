//! Selectable entities (cultivars and cultivation methods).

use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

/// The kinds of entity a picker can be built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// A plant variety, e.g. "Scarlet Kale".
    Cultivar,
    /// A growing technique, e.g. "Shallow Water Culture".
    CultivationMethod,
}

impl EntityKind {
    /// Every kind, in the order the builder presents them.
    pub const ALL: [EntityKind; 2] = [EntityKind::Cultivar, EntityKind::CultivationMethod];

    /// Key under which records of this kind live in a data bundle and in the
    /// output document.
    pub fn bundle_key(self) -> &'static str {
        match self {
            EntityKind::Cultivar => "cultivars",
            EntityKind::CultivationMethod => "cultivationMethods",
        }
    }

    /// Human readable plural label used for pane titles.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Cultivar => "Cultivars",
            EntityKind::CultivationMethod => "Cultivation Methods",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Cultivar => write!(f, "cultivar"),
            EntityKind::CultivationMethod => write!(f, "cultivation method"),
        }
    }
}

/// Error returned when a string does not name an [`EntityKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEntityKindError(String);

impl fmt::Display for ParseEntityKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown entity kind '{}'; expected cultivar or method", self.0)
    }
}

impl Error for ParseEntityKindError {}

impl FromStr for EntityKind {
    type Err = ParseEntityKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "cultivar" | "cultivars" => Ok(EntityKind::Cultivar),
            "method" | "methods" | "cultivationmethod" | "cultivationmethods" => Ok(EntityKind::CultivationMethod),
            _ => Err(ParseEntityKindError(s.to_string())),
        }
    }
}

/// Whether a picker may hold the same entity in more than one selection row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Every add appends a row, even for an entity already selected.
    #[default]
    Allow,
    /// Adding an already-selected entity is ignored.
    Reject,
}

/// A canonical, immutable catalog entry.
///
/// Serialized flat: kind-specific attributes sit next to `id`, `name` and
/// `description`. The legacy key `uuid` is accepted in place of `id` on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier, unique within a catalog.
    #[serde(alias = "uuid")]
    pub id: String,
    /// Display name; the only field searched.
    pub name: String,
    /// Short prose description.
    pub description: String,
    /// Kind-specific attributes in source order.
    #[serde(flatten)]
    pub attributes: JsonMap<String, JsonValue>,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            attributes: JsonMap::new(),
        }
    }

    /// Builder-style attribute insertion.
    pub fn with_attribute(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&JsonValue> {
        self.attributes.get(key)
    }

    /// Every field of the entity as `(name, value)` pairs: the three canonical
    /// fields first, then attributes in source order.
    pub fn fields(&self) -> Vec<(String, JsonValue)> {
        let mut fields = Vec::with_capacity(3 + self.attributes.len());
        fields.push(("id".to_string(), JsonValue::String(self.id.clone())));
        fields.push(("name".to_string(), JsonValue::String(self.name.clone())));
        fields.push(("description".to_string(), JsonValue::String(self.description.clone())));
        fields.extend(self.attributes.iter().map(|(key, value)| (key.clone(), value.clone())));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entity_serializes_flat() {
        let entity = Entity::new("u1", "Kale", "Leafy").with_attribute("average_duration_days", json!(60));
        let value = serde_json::to_value(&entity).expect("serialize entity");
        assert_eq!(
            value,
            json!({"id": "u1", "name": "Kale", "description": "Leafy", "average_duration_days": 60})
        );
    }

    #[test]
    fn entity_accepts_legacy_uuid_key() {
        let entity: Entity = serde_json::from_value(json!({
            "uuid": "30cbbded",
            "name": "Shallow Water Culture",
            "description": "Roots sit in water.",
            "link": "https://example.com"
        }))
        .expect("deserialize entity");
        assert_eq!(entity.id, "30cbbded");
        assert_eq!(entity.attribute("link"), Some(&json!("https://example.com")));
        assert!(entity.attribute("uuid").is_none());
    }

    #[test]
    fn fields_lists_canonical_fields_first() {
        let entity = Entity::new("u1", "Kale", "Leafy").with_attribute("link", json!("x"));
        let names: Vec<String> = entity.fields().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["id", "name", "description", "link"]);
    }

    #[test]
    fn kind_parses_common_spellings() {
        assert_eq!("cultivar".parse::<EntityKind>(), Ok(EntityKind::Cultivar));
        assert_eq!("cultivation-methods".parse::<EntityKind>(), Ok(EntityKind::CultivationMethod));
        assert_eq!("Method".parse::<EntityKind>(), Ok(EntityKind::CultivationMethod));
        assert!("lamp".parse::<EntityKind>().is_err());
    }

    #[test]
    fn kind_uses_camel_case_bundle_keys() {
        assert_eq!(EntityKind::CultivationMethod.bundle_key(), "cultivationMethods");
        assert_eq!(serde_json::to_value(EntityKind::CultivationMethod).unwrap(), json!("cultivationMethod"));
    }
}
