//! Data-loading collaborators that supply raw entity records.
//!
//! The transport behind a source is deliberately opaque to the rest of the
//! builder: catalogs only ever see a list of raw JSON records per kind.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sprout_types::EntityKind;
use thiserror::Error;

/// Errors raised while fetching raw records.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read entity data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("entity data in {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("entity data for {kind} is malformed: {message}")]
    Shape { kind: EntityKind, message: String },
}

/// Supplies raw records for each entity kind.
#[async_trait]
pub trait EntitySource: Send + Sync {
    async fn fetch(&self, kind: EntityKind) -> Result<Vec<JsonValue>, SourceError>;
}

/// Reads a JSON bundle of the form
/// `{"cultivars": [...], "cultivationMethods": [...]}` from disk.
///
/// A kind whose key is absent yields no records.
#[derive(Debug, Clone)]
pub struct FileEntitySource {
    path: PathBuf,
}

impl FileEntitySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EntitySource for FileEntitySource {
    async fn fetch(&self, kind: EntityKind) -> Result<Vec<JsonValue>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let bundle: JsonValue = serde_json::from_str(&content).map_err(|source| SourceError::Parse {
            path: self.path.clone(),
            source,
        })?;
        records_for(kind, &bundle)
    }
}

/// In-memory records, keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct StaticEntitySource {
    records: HashMap<EntityKind, Vec<JsonValue>>,
}

impl StaticEntitySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a source from a bundle value shaped like the file format.
    pub fn from_bundle(bundle: &JsonValue) -> Result<Self, SourceError> {
        let mut source = Self::new();
        for kind in EntityKind::ALL {
            source.records.insert(kind, records_for(kind, bundle)?);
        }
        Ok(source)
    }

    pub fn with_records(mut self, kind: EntityKind, records: Vec<JsonValue>) -> Self {
        self.records.insert(kind, records);
        self
    }
}

#[async_trait]
impl EntitySource for StaticEntitySource {
    async fn fetch(&self, kind: EntityKind) -> Result<Vec<JsonValue>, SourceError> {
        Ok(self.records.get(&kind).cloned().unwrap_or_default())
    }
}

fn records_for(kind: EntityKind, bundle: &JsonValue) -> Result<Vec<JsonValue>, SourceError> {
    let Some(object) = bundle.as_object() else {
        return Err(SourceError::Shape {
            kind,
            message: "bundle must be a JSON object".to_string(),
        });
    };
    match object.get(kind.bundle_key()) {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(records)) => Ok(records.clone()),
        Some(_) => Err(SourceError::Shape {
            kind,
            message: format!("`{}` must be an array", kind.bundle_key()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[tokio::test]
    async fn file_source_reads_each_kind() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"cultivars": [{{"id": "u1", "name": "Kale", "description": "Leafy"}}], "cultivationMethods": []}}"#
        )
        .expect("write bundle");

        let source = FileEntitySource::new(file.path());
        let cultivars = source.fetch(EntityKind::Cultivar).await.expect("fetch cultivars");
        let methods = source.fetch(EntityKind::CultivationMethod).await.expect("fetch methods");
        assert_eq!(cultivars.len(), 1);
        assert!(methods.is_empty());
    }

    #[tokio::test]
    async fn file_source_reports_missing_file() {
        let source = FileEntitySource::new("/definitely/not/here.json");
        let error = source.fetch(EntityKind::Cultivar).await.unwrap_err();
        assert!(matches!(error, SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn file_source_reports_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{not json").expect("write bundle");
        let error = FileEntitySource::new(file.path()).fetch(EntityKind::Cultivar).await.unwrap_err();
        assert!(matches!(error, SourceError::Parse { .. }));
    }

    #[tokio::test]
    async fn missing_kind_yields_no_records() {
        let source = StaticEntitySource::from_bundle(&json!({"cultivars": []})).expect("bundle");
        assert!(source.fetch(EntityKind::CultivationMethod).await.unwrap().is_empty());
    }

    #[test]
    fn non_array_kind_is_a_shape_error() {
        let error = StaticEntitySource::from_bundle(&json!({"cultivars": {"id": "u1"}})).unwrap_err();
        assert!(matches!(error, SourceError::Shape { kind: EntityKind::Cultivar, .. }));
    }
}
