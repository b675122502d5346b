use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use sprout_engine::{
    AssembledDocument, DraftReport, JsonFileSubmission, RecipeForm, JsonWriterSubmission, RecipeSession, Submission, load_draft_from_file,
};
use sprout_registry::{BuilderConfig, CatalogSet, FileEntitySource, default_config_path, sprout_config_dir};
use sprout_types::EntityKind;
use tracing::{info, warn};

/// Build grow recipes from cultivar and cultivation-method catalogs.
#[derive(Parser, Debug)]
#[command(name = "sprout", version, about)]
struct Args {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Entity data bundle; overrides `data_path` from the config
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List entities whose name contains the query (case-insensitive)
    Search {
        kind: EntityKind,
        #[arg(default_value = "")]
        query: String,
    },
    /// Print every field of one entity as JSON
    Show { kind: EntityKind, id: String },
    /// List the environment variables offered on every environment
    Variables,
    /// Build a recipe document from a YAML draft
    Build {
        draft: PathBuf,
        /// Write the document here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Fail when the draft or any field has a problem
        #[arg(long)]
        strict: bool,
    },
    /// Pick entities interactively, optionally starting from a draft
    Pick {
        #[arg(long)]
        draft: Option<PathBuf>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Show the effective configuration, or write it with --write
    Config {
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let interactive = matches!(args.command, Command::Pick { .. });
    init_tracing(interactive)?;

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let config = if args.config.is_some() {
        BuilderConfig::load_from(&config_path)?
    } else {
        BuilderConfig::load()
    };

    match args.command {
        Command::Variables => {
            for (name, kind) in config.variables.iter() {
                println!("{name}\t{kind}");
            }
            Ok(())
        }
        Command::Config { write } => run_config(&config, &config_path, write),
        Command::Search { kind, query } => {
            let catalogs = load_catalogs(args.data.as_deref(), &config).await?;
            for entity in catalogs.get(kind).search(&query) {
                println!("{}\t{}", entity.id, entity.name);
            }
            Ok(())
        }
        Command::Show { kind, id } => {
            let catalogs = load_catalogs(args.data.as_deref(), &config).await?;
            let catalog = catalogs.get(kind);
            let Some(entity) = catalog.lookup(&id) else {
                bail!("no {kind} with id '{id}'");
            };
            println!("{}", serde_json::to_string_pretty(entity)?);
            Ok(())
        }
        Command::Build { draft, output, strict } => {
            let catalogs = load_catalogs(args.data.as_deref(), &config).await?;
            let mut session = RecipeSession::from_config(&catalogs, &config);
            let draft = load_draft_from_file(&draft)?;
            let report = session.apply_draft(&draft);
            report_draft_problems(&report);
            report_unlisted_environments(&session.form);

            let assembled = session.build_document()?;
            report_field_issues(&assembled);
            if strict && !(report.is_clean() && assembled.issues.is_empty()) {
                bail!("draft has problems; nothing written");
            }
            submit(&assembled, output.as_deref())
        }
        Command::Pick { draft, output } => {
            let catalogs = load_catalogs(args.data.as_deref(), &config).await?;
            let mut session = RecipeSession::from_config(&catalogs, &config);
            if let Some(draft) = draft {
                let report = session.apply_draft(&load_draft_from_file(&draft)?);
                report_draft_problems(&report);
            }

            let outcome = tokio::task::spawn_blocking(move || sprout_tui::run(session))
                .await
                .context("picker task failed")??;
            match outcome {
                Some(assembled) => {
                    report_field_issues(&assembled);
                    submit(&assembled, output.as_deref())
                }
                None => {
                    info!("picker closed without a document");
                    Ok(())
                }
            }
        }
    }
}

/// Installs the tracing subscriber. `RUST_LOG` overrides the default `info`
/// filter. The picker owns the terminal, so its logs go to a file.
fn init_tracing(interactive: bool) -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if interactive {
        let directory = sprout_config_dir();
        fs::create_dir_all(&directory).with_context(|| format!("failed to create {}", directory.display()))?;
        let path = directory.join("sprout.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        let _ = builder.with_ansi(false).with_writer(Mutex::new(file)).try_init();
    } else {
        let _ = builder.with_writer(io::stderr).try_init();
    }
    Ok(())
}

fn resolve_data_path(flag: Option<&Path>, config: &BuilderConfig) -> Result<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.data_path())
        .context("no entity data bundle: pass --data or set data_path in the config")
}

async fn load_catalogs(flag: Option<&Path>, config: &BuilderConfig) -> Result<CatalogSet> {
    let path = resolve_data_path(flag, config)?;
    let source = FileEntitySource::new(&path);
    let catalogs = CatalogSet::initialize(&source)
        .await
        .with_context(|| format!("failed to load entity data from {}", path.display()))?;
    for rejected in catalogs.rejected() {
        eprintln!("skipped record: {rejected}");
    }
    Ok(catalogs)
}

fn run_config(config: &BuilderConfig, path: &Path, write: bool) -> Result<()> {
    if write {
        config.save(path)?;
        eprintln!("wrote {}", path.display());
    }
    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn report_draft_problems(report: &DraftReport) {
    for problem in &report.problems {
        eprintln!("draft: {problem}");
    }
}

fn report_unlisted_environments(form: &RecipeForm) {
    for unlisted in form.unlisted_cycle_environments() {
        eprintln!("note: {unlisted} ({})", form.environment_names().join(", "));
    }
}

fn report_field_issues(assembled: &AssembledDocument) {
    for issue in &assembled.issues {
        warn!(path = %issue.path, raw = %issue.raw, "field written as null");
        eprintln!("{issue}; written as null");
    }
}

fn submit(assembled: &AssembledDocument, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => JsonFileSubmission::new(path).submit(&assembled.document)?,
        None => JsonWriterSubmission::new(io::stdout().lock()).submit(&assembled.document)?,
    }
    Ok(())
}
