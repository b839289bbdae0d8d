//! Command dispatch for the dupeindex binary.
//!
//! Every command returns an [`ExitCode`] or an error; only `main` turns
//! either into a process exit.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, LookupArgs, ScanArgs, ShowArgs};
use crate::config::Config;
use crate::error::ExitCode;
use crate::index::{FileRecord, Index, Indexer};
use crate::logging::init_logging;
use crate::progress::Progress;
use crate::store;

/// Run the command selected on the command line.
///
/// # Errors
///
/// Returns an error if configuration loading, scanning, hashing or any index
/// file operation fails.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    init_logging(cli.verbose, cli.quiet);
    let config = Config::load()?;
    let show_progress = !cli.quiet && !cli.no_progress;

    match cli.command {
        Commands::Scan(args) => run_scan(args, &config, show_progress),
        Commands::Show(args) => run_show(&args, &config),
        Commands::Lookup(args) => run_lookup(&args, &config),
    }
}

fn run_scan(args: ScanArgs, config: &Config, show_progress: bool) -> Result<ExitCode> {
    let interval = match args.progress_interval {
        Some(n) => usize::try_from(n).context("Progress interval is too large")?,
        None => config.progress_interval,
    };

    let output = match args.output {
        Some(path) => path,
        None => default_output(config)?,
    };

    let mut indexer = Indexer::new().with_progress_interval(interval);
    if show_progress {
        indexer = indexer.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let index = indexer
        .index_dir(&args.path)
        .with_context(|| format!("Failed to index {}", args.path.display()))?;

    store::write_index(&index, &output)?;

    println!(
        "Indexed {} files ({} distinct contents, {} duplicate groups) into {}",
        index.record_count(),
        index.len(),
        index.duplicates().count(),
        output.display()
    );
    Ok(ExitCode::Success)
}

/// The configured index file, creating its directory when it is the
/// platform default.
fn default_output(config: &Config) -> Result<PathBuf> {
    let path = config.resolve_index_file()?;
    if config.index_file.is_none() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create cache directory: {}", parent.display())
            })?;
        }
    }
    Ok(path)
}

fn index_file(file: Option<&Path>, config: &Config) -> Result<PathBuf> {
    match file {
        Some(path) => Ok(path.to_path_buf()),
        None => config.resolve_index_file(),
    }
}

fn run_show(args: &ShowArgs, config: &Config) -> Result<ExitCode> {
    let path = index_file(args.file.as_deref(), config)?;
    // Provenance is logged by the store while reading
    let index = store::read_index(&path)?;

    if args.json {
        let json = serde_json::to_string_pretty(&store::data::Payload(&index))
            .context("Failed to render index as JSON")?;
        println!("{}", json);
        return Ok(ExitCode::Success);
    }

    let groups: Box<dyn Iterator<Item = (&str, &[FileRecord])>> = if args.duplicates {
        Box::new(index.duplicates())
    } else {
        Box::new(index.all())
    };
    for (key, records) in groups {
        print_group(key, records);
    }
    print_summary(&index);

    Ok(ExitCode::Success)
}

fn run_lookup(args: &LookupArgs, config: &Config) -> Result<ExitCode> {
    let path = index_file(args.file.as_deref(), config)?;
    let index = store::read_index(&path)?;
    let key = args.key.trim().to_ascii_lowercase();

    let records = index.get(&key);
    if records.is_empty() {
        log::warn!("No files stored under {} in {}", key, path.display());
        return Ok(ExitCode::KeyNotFound);
    }

    for record in records {
        println!("{}", record.path().display());
    }
    Ok(ExitCode::Success)
}

fn print_group(key: &str, records: &[FileRecord]) {
    println!("{} ({} files)", key, records.len());
    for record in records {
        println!(
            "    {}  {} bytes  {:o}  {}",
            record.path().display(),
            record.size(),
            record.mode(),
            record.mod_time().to_rfc3339()
        );
    }
}

fn print_summary(index: &Index) {
    println!(
        "\n{} files, {} distinct contents, {} duplicate groups",
        index.record_count(),
        index.len(),
        index.duplicates().count()
    );
}
