//! # Sprout TUI
//!
//! Terminal interface over a [`RecipeSession`]: one picker per entity kind
//! with incremental search, a detail panel for the highlighted result, the
//! ordered selection and a live preview of the document that would be
//! submitted.
//!
//! ## Architecture
//!
//! `app::App` holds all interaction state and maps keys onto the picker
//! handlers; `ui::view` only renders from it. `ui::runtime` owns the terminal.

pub mod app;
pub mod ui;

use anyhow::Result;
use sprout_engine::{AssembledDocument, RecipeSession};

/// Runs the picker until the user submits or quits.
///
/// Returns the assembled document on submit (Ctrl-S) and `None` when the
/// user quits. The call blocks on terminal input.
///
/// # Errors
///
/// Terminal setup or teardown failures and I/O errors while reading input.
///
/// # Example
///
/// ```no_run
/// use sprout_engine::{FormSchema, RecipeSession};
/// use sprout_registry::{CatalogSet, FileEntitySource};
/// use sprout_types::DuplicatePolicy;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let catalogs = CatalogSet::initialize(&FileEntitySource::new("catalog.json")).await?;
///     let session = RecipeSession::new(&catalogs, FormSchema::default(), DuplicatePolicy::Allow);
///     if let Some(assembled) = sprout_tui::run(session)? {
///         println!("{}", serde_json::to_string_pretty(&assembled.document)?);
///     }
///     Ok(())
/// }
/// ```
pub fn run(session: RecipeSession) -> Result<Option<AssembledDocument>> {
    ui::runtime::run_app(session)
}
