//! Where a finished recipe document goes.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use sprout_types::RecipeDocument;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to encode recipe document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write recipe document to {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: io::Error,
    },
}

/// Receives assembled documents.
pub trait Submission {
    fn submit(&mut self, document: &RecipeDocument) -> Result<(), SubmitError>;
}

/// Writes pretty JSON followed by a newline to any writer, e.g. stdout.
#[derive(Debug)]
pub struct JsonWriterSubmission<W> {
    writer: W,
}

impl<W: Write> JsonWriterSubmission<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Submission for JsonWriterSubmission<W> {
    fn submit(&mut self, document: &RecipeDocument) -> Result<(), SubmitError> {
        let encoded = serde_json::to_string_pretty(document)?;
        writeln!(self.writer, "{encoded}")
            .and_then(|()| self.writer.flush())
            .map_err(|source| SubmitError::Io {
                target: "output stream".to_string(),
                source,
            })
    }
}

/// Writes pretty JSON to a file, creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct JsonFileSubmission {
    path: PathBuf,
}

impl JsonFileSubmission {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SubmitError {
        SubmitError::Io {
            target: self.path.display().to_string(),
            source,
        }
    }
}

impl Submission for JsonFileSubmission {
    fn submit(&mut self, document: &RecipeDocument) -> Result<(), SubmitError> {
        let encoded = serde_json::to_string_pretty(document)?;
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        fs::write(&self.path, format!("{encoded}\n")).map_err(|source| self.io_error(source))?;
        info!(path = %self.path.display(), "recipe document written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn document() -> RecipeDocument {
        RecipeDocument {
            name: "Kale Sprint".into(),
            ..RecipeDocument::default()
        }
    }

    #[test]
    fn writer_submission_emits_pretty_json() {
        let mut submission = JsonWriterSubmission::new(Vec::new());
        submission.submit(&document()).unwrap();
        let written = String::from_utf8(submission.into_inner()).unwrap();
        assert!(written.ends_with("}\n"));
        assert!(written.contains("\n  \"name\": \"Kale Sprint\""));
    }

    #[test]
    fn file_submission_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("recipe.json");
        let mut submission = JsonFileSubmission::new(&path);
        submission.submit(&document()).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["name"], json!("Kale Sprint"));
        assert_eq!(written["cultivationMethods"], json!([]));
    }
}
