//! Recipe drafts: a YAML (or JSON) description of what a user would enter
//! into the builder, replayed through the same picker and form operations.

use std::{fmt, fs, path::Path};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use sprout_types::EntityKind;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    document::RecipeSession,
    form::{FormError, RecipeDetails},
};

/// A scalar as written in a draft. Everything is kept as raw text once applied;
/// a blank value (`repeat:` or `~`) is the empty string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DraftScalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl DraftScalar {
    pub fn to_raw(&self) -> String {
        self.to_string()
    }
}

impl Default for DraftScalar {
    fn default() -> Self {
        DraftScalar::Text(String::new())
    }
}

impl fmt::Display for DraftScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftScalar::Null => Ok(()),
            DraftScalar::Bool(value) => write!(f, "{value}"),
            DraftScalar::Integer(value) => write!(f, "{value}"),
            DraftScalar::Float(value) => write!(f, "{value}"),
            DraftScalar::Text(value) => f.write_str(value),
        }
    }
}

/// Field values for one environment or cycle, `name` included.
pub type DraftFields = IndexMap<String, DraftScalar>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DraftDescription {
    pub brief: String,
    pub verbose: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhaseDraft {
    pub name: DraftScalar,
    pub repeat: DraftScalar,
    pub cycles: Vec<DraftFields>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecipeDraft {
    pub name: String,
    pub description: DraftDescription,
    pub cultivars: Vec<String>,
    #[serde(alias = "cultivation_methods")]
    pub cultivation_methods: Vec<String>,
    pub environments: Vec<DraftFields>,
    pub phases: Vec<PhaseDraft>,
}

impl RecipeDraft {
    pub fn ids(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Cultivar => &self.cultivars,
            EntityKind::CultivationMethod => &self.cultivation_methods,
        }
    }
}

/// Something in a draft that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("no {kind} with id '{id}' in the catalog")]
    UnknownEntity { kind: EntityKind, id: String },
    #[error("{kind} '{id}' is already selected")]
    DuplicateRefused { kind: EntityKind, id: String },
    #[error(transparent)]
    Form(#[from] FormError),
}

/// Outcome of [`RecipeSession::apply_draft`]. Problems are collected, never fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftReport {
    pub problems: Vec<DraftError>,
}

impl DraftReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    fn push(&mut self, problem: DraftError) {
        warn!(%problem, "draft entry skipped");
        self.problems.push(problem);
    }
}

/// Reads and parses a draft file. JSON drafts parse too, being valid YAML.
pub fn load_draft_from_file(path: impl AsRef<Path>) -> Result<RecipeDraft> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).with_context(|| format!("failed to read draft file: {}", path.display()))?;
    let draft = serde_yaml::from_str(&content).with_context(|| format!("failed to parse draft file: {}", path.display()))?;
    debug!(path = %path.display(), "draft loaded");
    Ok(draft)
}

impl RecipeSession {
    /// Replays a draft onto this session.
    ///
    /// Details are overwritten; entity ids, environments and phases are
    /// appended after whatever the session already holds.
    pub fn apply_draft(&mut self, draft: &RecipeDraft) -> DraftReport {
        let mut report = DraftReport::default();

        self.form.details = RecipeDetails {
            name: draft.name.clone(),
            brief_description: draft.description.brief.clone(),
            verbose_description: draft.description.verbose.clone(),
        };

        for kind in EntityKind::ALL {
            let picker = self.picker_mut(kind);
            for id in draft.ids(kind) {
                if !picker.catalog().contains(id) {
                    report.push(DraftError::UnknownEntity { kind, id: id.clone() });
                } else if picker.on_add(id).is_none() {
                    report.push(DraftError::DuplicateRefused { kind, id: id.clone() });
                }
            }
        }

        for fields in &draft.environments {
            let index = self.form.add_environment();
            for (field, value) in fields {
                let applied = self.form.environment_mut(index).and_then(|environment| environment.set(field, value.to_raw()));
                if let Err(error) = applied {
                    report.push(error.into());
                }
            }
        }

        for phase in &draft.phases {
            let phase_index = self.form.add_phase();
            if let Ok(phase_form) = self.form.phase_mut(phase_index) {
                phase_form.name = phase.name.to_raw();
                phase_form.repeat = phase.repeat.to_raw();
            }
            for fields in &phase.cycles {
                self.apply_cycle(phase_index, fields, &mut report);
            }
        }

        info!(problems = report.len(), "draft applied");
        report
    }

    fn apply_cycle(&mut self, phase: usize, fields: &DraftFields, report: &mut DraftReport) {
        let cycle = match self.form.add_cycle(phase) {
            Ok(cycle) => cycle,
            Err(error) => return report.push(error.into()),
        };
        for (field, value) in fields {
            let applied = self.form.cycle_mut(phase, cycle).and_then(|row| row.set(field, value.to_raw()));
            if let Err(error) = applied {
                report.push(error.into());
            }
        }
    }
}
