//! Kind-specific normalization of raw records into canonical [`Entity`] values.
//!
//! Two record shapes are understood:
//!
//! - **nested** records, as exported by the recipe backend: `name` and `uuid`
//!   at the top level, everything else under an `info` object, with the
//!   description split into `brief` and `verbose` variants;
//! - **flat** records already in canonical shape (`id`/`uuid`, `name`,
//!   `description`, then free-form attributes).
//!
//! Which description variant a nested record contributes, and which `info`
//! attributes are carried over, depends on the [`EntityKind`].

use serde_json::{Map as JsonMap, Value as JsonValue};
use sprout_types::{Entity, EntityKind};

use crate::catalog::CatalogError;

/// Attributes copied from `info` for nested cultivar records.
const CULTIVAR_INFO_ATTRIBUTES: &[&str] = &[
    "link",
    "average_height_centimeters",
    "average_width_centimeters",
    "average_duration_days",
    "duration_start_stage",
];

const CANONICAL_KEYS: &[&str] = &["id", "uuid", "name", "description"];

/// Normalizes one raw record. `index` is the record's position in the source
/// list and is only used for error reporting.
pub fn normalize_record(kind: EntityKind, index: usize, record: &JsonValue) -> Result<Entity, CatalogError> {
    let Some(object) = record.as_object() else {
        return Err(CatalogError::NotAnObject { kind, index });
    };

    match object.get("info").and_then(JsonValue::as_object) {
        Some(info) => normalize_nested(kind, index, object, info),
        None => normalize_flat(kind, index, object),
    }
}

fn normalize_nested(
    kind: EntityKind,
    index: usize,
    object: &JsonMap<String, JsonValue>,
    info: &JsonMap<String, JsonValue>,
) -> Result<Entity, CatalogError> {
    let id = required_id(kind, index, object)?;
    let name = required_string(kind, index, object.get("name"), "name")?;

    let (variant, field) = match kind {
        EntityKind::Cultivar => ("brief", "info.description.brief"),
        EntityKind::CultivationMethod => ("verbose", "info.description.verbose"),
    };
    let description = info.get("description").and_then(|description| description.get(variant));
    let description = required_string(kind, index, description, field)?;

    let mut entity = Entity::new(id, name, description);
    if kind == EntityKind::Cultivar {
        for key in CULTIVAR_INFO_ATTRIBUTES {
            if let Some(value) = info.get(*key).filter(|value| !value.is_null()) {
                entity.attributes.insert((*key).to_string(), value.clone());
            }
        }
    }
    Ok(entity)
}

fn normalize_flat(kind: EntityKind, index: usize, object: &JsonMap<String, JsonValue>) -> Result<Entity, CatalogError> {
    let id = required_id(kind, index, object)?;
    let name = required_string(kind, index, object.get("name"), "name")?;
    let description = required_string(kind, index, object.get("description"), "description")?;

    let mut entity = Entity::new(id, name, description);
    for (key, value) in object {
        if CANONICAL_KEYS.contains(&key.as_str()) || value.is_null() {
            continue;
        }
        entity.attributes.insert(key.clone(), value.clone());
    }
    Ok(entity)
}

fn required_id(kind: EntityKind, index: usize, object: &JsonMap<String, JsonValue>) -> Result<String, CatalogError> {
    let value = object.get("id").or_else(|| object.get("uuid"));
    required_string(kind, index, value, "id")
}

fn required_string(kind: EntityKind, index: usize, value: Option<&JsonValue>, field: &str) -> Result<String, CatalogError> {
    match value.and_then(JsonValue::as_str) {
        Some(text) => Ok(text.to_string()),
        None => Err(CatalogError::MalformedEntity {
            kind,
            index,
            field: field.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_cultivar() -> JsonValue {
        json!({
            "name": "Scarlet Kale",
            "uuid": "d6d76ff9-b12e-47bb-8e83-f872c7870856",
            "info": {
                "description": {"brief": "Red veined, tightly curled purple leaves.", "verbose": "Long form."},
                "link": "https://www.seedsavers.org/scarlet-kale",
                "average_height_centimeters": 80,
                "average_width_centimeters": 60,
                "average_duration_days": 60,
                "duration_start_stage": "seedling",
                "internal_notes": "not carried over"
            }
        })
    }

    #[test]
    fn nested_cultivar_uses_brief_description_and_info_attributes() {
        let entity = normalize_record(EntityKind::Cultivar, 0, &nested_cultivar()).expect("normalize cultivar");
        assert_eq!(entity.id, "d6d76ff9-b12e-47bb-8e83-f872c7870856");
        assert_eq!(entity.description, "Red veined, tightly curled purple leaves.");
        assert_eq!(entity.attribute("average_height_centimeters"), Some(&json!(80)));
        assert_eq!(entity.attribute("duration_start_stage"), Some(&json!("seedling")));
        assert!(entity.attribute("internal_notes").is_none());
    }

    #[test]
    fn nested_method_uses_verbose_description_only() {
        let record = json!({
            "name": "Shallow Water Culture",
            "uuid": "30cbbded-07a7-4c49-a47b-e34fc99eefd0",
            "info": {"description": {"brief": "Short.", "verbose": "Roots sit in a mix of water and nutrients."}, "link": "x"}
        });
        let entity = normalize_record(EntityKind::CultivationMethod, 0, &record).expect("normalize method");
        assert_eq!(entity.description, "Roots sit in a mix of water and nutrients.");
        assert!(entity.attributes.is_empty());
    }

    #[test]
    fn flat_record_keeps_extra_keys_as_attributes() {
        let record = json!({"uuid": "u1", "name": "Kale", "description": "Leafy", "link": "x", "unused": null});
        let entity = normalize_record(EntityKind::Cultivar, 3, &record).expect("normalize flat");
        assert_eq!(entity.id, "u1");
        assert_eq!(entity.attributes.len(), 1);
        assert_eq!(entity.attribute("link"), Some(&json!("x")));
    }

    #[test]
    fn missing_nested_description_names_the_path() {
        let record = json!({"name": "Kale", "uuid": "u1", "info": {"description": {"verbose": "only verbose"}}});
        let error = normalize_record(EntityKind::Cultivar, 4, &record).unwrap_err();
        assert_eq!(
            error,
            CatalogError::MalformedEntity {
                kind: EntityKind::Cultivar,
                index: 4,
                field: "info.description.brief".into()
            }
        );
    }

    #[test]
    fn non_string_id_is_malformed() {
        let record = json!({"id": 7, "name": "Kale", "description": "Leafy"});
        let error = normalize_record(EntityKind::Cultivar, 0, &record).unwrap_err();
        assert!(matches!(error, CatalogError::MalformedEntity { ref field, .. } if field == "id"));
    }

    #[test]
    fn non_object_record_is_rejected() {
        let error = normalize_record(EntityKind::CultivationMethod, 2, &json!("kale")).unwrap_err();
        assert_eq!(
            error,
            CatalogError::NotAnObject {
                kind: EntityKind::CultivationMethod,
                index: 2
            }
        );
    }
}
