//! survey - recursive filesystem inventory.
//!
//! Usage:
//!   survey [CONFIG]                  Survey using a JSON config file
//!   survey --root PATH               Survey PATH with default rules
//!   survey --root PATH --no-db       Skip the SQLite output
//!   survey --list                    Print every entry after the scan
//!   survey --help                    Show help

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use survey_core::{EntryKind, ScanResult, SurveyConfig};
use survey_export::{RowSink, SqliteStore, export_rows, write_document};
use survey_scan::Walker;

#[derive(Parser)]
#[command(
    name = "survey",
    version,
    about = "Recursive filesystem survey with partial-content hashing",
    long_about = "survey walks a directory tree, records every file, directory and link \
                  with its metadata and a hash of its first bytes, and exports the result \
                  as a JSON document and/or an SQLite database."
)]
struct Cli {
    /// JSON config file (keys: root, hashSize, excludedExtensions, excludedFolders, jsonFile, dbFile)
    config: Option<PathBuf>,

    /// Root directory to survey (overrides the config file)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Bytes read from the start of each file for its hash
    #[arg(long)]
    hash_size: Option<u64>,

    /// JSON document output file
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// SQLite database output file
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Skip the JSON document output
    #[arg(long)]
    no_json: bool,

    /// Skip the SQLite output
    #[arg(long)]
    no_db: bool,

    /// Worker threads for sibling directories (1 = sequential, 0 = all cores)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Only survey the root's immediate children
    #[arg(long)]
    no_recursive: bool,

    /// Print directories, files, links and errors after the scan
    #[arg(short, long)]
    list: bool,

    /// Enable debug logging (overridden by SURVEY_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = build_config(&cli)?;
    remove_previous_outputs(&config);

    let start = Instant::now();
    info!("Building recursive tree from: {}", config.root.display());

    let result = Walker::new()
        .walk(&config)
        .wrap_err_with(|| format!("Cannot survey {}", config.root.display()))?;

    let summary = result.summary();
    println!("{summary}");
    println!(
        " {} hashed, {} excluded, {} in files",
        summary.hashed,
        summary.excluded,
        format_size(summary.total_size)
    );
    info!("Finished directory search: {}", format_elapsed(start.elapsed()));

    if cli.list {
        print_listing(&result);
    }

    let mut failures = 0;

    if let Some(path) = config.json_target() {
        match write_document(&result, path) {
            Ok(()) => info!("JSON file saved: {}", format_elapsed(start.elapsed())),
            Err(err) => {
                error!(path = %path.display(), "JSON export failed: {err}");
                failures += 1;
            }
        }
    }

    if let Some(path) = config.db_target() {
        if let Err(err) = run_sqlite_export(&result, path, start) {
            error!(path = %path.display(), "database export failed: {err:#}");
            failures += 1;
        }
    }

    info!("Total build time: {}", format_elapsed(start.elapsed()));

    if failures > 0 {
        return Err(eyre!("{failures} export(s) failed"));
    }
    Ok(())
}

/// Install the tracing subscriber on stderr.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env("SURVEY_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge the config file (if any) with command-line overrides.
fn build_config(cli: &Cli) -> Result<SurveyConfig> {
    let mut config = match &cli.config {
        Some(path) => SurveyConfig::load(path)
            .wrap_err_with(|| format!("Invalid config file {}", path.display()))?,
        None => SurveyConfig::default(),
    };

    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if let Some(hash_size) = cli.hash_size {
        config.hash_size = hash_size;
    }
    if let Some(json) = &cli.json {
        config.json_file = Some(json.clone());
    }
    if let Some(db) = &cli.db {
        config.db_file = Some(db.clone());
    }
    if cli.no_json {
        config.json_file = None;
    }
    if cli.no_db {
        config.db_file = None;
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if cli.no_recursive {
        config.recursive = false;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Delete outputs left by an earlier run so stale data never survives.
fn remove_previous_outputs(config: &SurveyConfig) {
    for path in [config.json_target(), config.db_target()].into_iter().flatten() {
        match std::fs::remove_file(path) {
            Ok(()) => info!(path = %path.display(), "removed previous output"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => error!(path = %path.display(), "cannot remove previous output: {err}"),
        }
    }
}

/// Load rows into an in-memory database, then snapshot it to `path`.
fn run_sqlite_export(result: &ScanResult, path: &Path, start: Instant) -> Result<()> {
    let mut store = SqliteStore::open_in_memory().context("Cannot open in-memory database")?;
    export_rows(result, &mut store).context("Cannot load rows")?;
    info!("SQLite in-memory database ready: {}", format_elapsed(start.elapsed()));

    store.snapshot_to(path).context("Cannot save database")?;
    info!("SQLite database saved: {}", format_elapsed(start.elapsed()));
    Ok(())
}

/// Print every entry grouped by kind, then every error.
fn print_listing(result: &ScanResult) {
    for (title, kind) in [
        ("Directories", EntryKind::Directory),
        ("Files", EntryKind::File),
        ("Links", EntryKind::Link),
    ] {
        println!("{title}...");
        for entry in result.entries_of(kind) {
            let marker = if entry.exclude { " (x)" } else { "" };
            println!("  {}{}", entry.file, marker);
        }
    }

    println!("Errors...");
    for err in &result.errors {
        println!("  [{}] {}", err.error, err.path);
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Format an elapsed time as days, hours, minutes and seconds.
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let fraction = elapsed.as_secs_f64() - secs as f64;
    let (days, hours, mins) = (secs / 86_400, secs % 86_400 / 3_600, secs % 3_600 / 60);
    let rest = (secs % 60) as f64 + fraction;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days} days"));
    }
    if days > 0 || hours > 0 {
        parts.push(format!("{hours} hrs"));
    }
    if days > 0 || hours > 0 || mins > 0 {
        parts.push(format!("{mins} mins"));
    }
    parts.push(format!("{rest:.3} secs"));
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(1_500)), "1.500 secs");
        assert_eq!(format_elapsed(Duration::from_secs(125)), "2 mins, 5.000 secs");
        assert_eq!(
            format_elapsed(Duration::from_secs(90_061)),
            "1 days, 1 hrs, 1 mins, 1.000 secs"
        );
    }

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = Cli::parse_from([
            "survey", "--root", "/data", "--hash-size", "64", "--no-db", "-j", "4",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.root, PathBuf::from("/data"));
        assert_eq!(config.hash_size, 64);
        assert_eq!(config.threads, 4);
        assert!(config.db_target().is_none());
        assert!(config.json_target().is_some());
    }

    #[test]
    fn test_cli_rejects_zero_hash_size() {
        let cli = Cli::parse_from(["survey", "--hash-size", "0"]);
        assert!(build_config(&cli).is_err());
    }
}
