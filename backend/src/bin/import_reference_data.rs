//! Load ingredient and tag reference data from CSV files.
//!
//! Ingredients are `name,measurement_unit` rows and tags are `name,slug`
//! rows. Rows already stored with identical values are skipped; each file
//! is imported in one transaction.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use recipe_backend::domain::{ImportReport, ReferenceDataService};
use recipe_backend::outbound::persistence::{
    DbPool, DieselReferenceDataRepository, PoolConfig, run_pending_migrations,
};
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `import-reference-data` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-reference-data",
    about = "Import ingredients and tags from CSV files",
    version
)]
struct CliArgs {
    /// CSV file of `name,measurement_unit` rows.
    #[arg(long, value_name = "path")]
    ingredients: Option<PathBuf>,
    /// CSV file of `name,slug` rows.
    #[arg(long, value_name = "path")]
    tags: Option<PathBuf>,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Apply pending migrations before importing.
    #[arg(long)]
    migrate: bool,
}

fn main() -> io::Result<()> {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "tracing init failed");
    }
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    if args.ingredients.is_none() && args.tags.is_none() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "nothing to import: pass --ingredients and/or --tags",
        ));
    }
    // Read both files up front so a missing file aborts before any write.
    let ingredients = args.ingredients.as_deref().map(read_file).transpose()?;
    let tags = args.tags.as_deref().map(read_file).transpose()?;

    let database_url = resolve_database_url(args.database_url, env::var("DATABASE_URL").ok())?;
    if args.migrate {
        let url = database_url.clone();
        let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .map_err(|error| io::Error::other(format!("migration task failed: {error}")))?
            .map_err(|error| io::Error::other(error.to_string()))?;
        info!(applied, "migrations applied");
    }
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(2))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let service = ReferenceDataService::new(Arc::new(DieselReferenceDataRepository::new(pool)));

    if let Some(contents) = ingredients {
        let report = service
            .import_ingredients_csv(&contents)
            .await
            .map_err(|error| io::Error::other(format!("ingredient import failed: {error}")))?;
        log_report("ingredients", report);
    }
    if let Some(contents) = tags {
        let report = service
            .import_tags_csv(&contents)
            .await
            .map_err(|error| io::Error::other(format!("tag import failed: {error}")))?;
        log_report("tags", report);
    }
    Ok(())
}

fn log_report(kind: &str, report: ImportReport) {
    info!(
        kind,
        inserted = report.inserted,
        skipped = report.skipped,
        "reference data imported"
    );
}

fn read_file(path: &Path) -> io::Result<String> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "input path must be a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open input directory '{}': {error}",
            parent.display()
        ))
    })?;
    let mut file = directory.open(Path::new(file_name)).map_err(|error| {
        io::Error::other(format!("open input file '{}': {error}", path.display()))
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|error| {
        io::Error::other(format!("read input file '{}': {error}", path.display()))
    })?;
    Ok(contents)
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> io::Result<String> {
    let (value, source) = match (explicit, from_env) {
        (Some(value), _) => (value, "--database-url"),
        (None, Some(value)) => (value, "DATABASE_URL"),
        (None, None) => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "database URL missing: set --database-url or DATABASE_URL",
            ));
        }
    };
    if value.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{source} must not be empty"),
        ));
    }
    Ok(value)
}
