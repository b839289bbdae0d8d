//! Command-line interface definitions for dupeindex.
//!
//! This module defines all CLI arguments and subcommands using the clap
//! derive API. Global options control verbosity and error reporting; the
//! subcommands build, inspect and query index files.
//!
//! # Example
//!
//! ```bash
//! # Index a directory into the default index file
//! dupeindex scan ~/Downloads
//!
//! # Index into a specific file
//! dupeindex scan ~/Downloads --output downloads.json.gz
//!
//! # List only groups of duplicates
//! dupeindex show downloads.json.gz --duplicates
//!
//! # Print the files stored under one content key
//! dupeindex lookup 78138d2003f1a87043d65c692fb3a64b downloads.json.gz
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Content-addressed file index for finding duplicate files.
///
/// dupeindex walks a directory tree, hashes every file and groups the files
/// by content, storing the result in a compressed index file.
#[derive(Debug, Parser)]
#[command(name = "dupeindex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Disable progress bars
    #[arg(long, global = true, env = "DUPEINDEX_NO_PROGRESS")]
    pub no_progress: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for dupeindex.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Index a directory and write the index file
    Scan(ScanArgs),
    /// Print the contents of an index file
    Show(ShowArgs),
    /// Print the files stored under a content key
    Lookup(LookupArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory path to index
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Index file to write (defaults to the configured index file)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of files between progress log lines
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub progress_interval: Option<u64>,
}

/// Arguments for the show subcommand.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Index file to read (defaults to the configured index file)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Only print groups with two or more files
    #[arg(short, long)]
    pub duplicates: bool,

    /// Print the decoded index as pretty JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the lookup subcommand.
#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Content key (lowercase hex MD5 digest)
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Index file to read (defaults to the configured index file)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}
