//! Logging setup for dupeindex.
//!
//! Library code only talks to the `log` facade; the binary installs an
//! `env_logger` backend here. The level comes from, in priority order:
//!
//! 1. `RUST_LOG` (if set)
//! 2. `--quiet` (errors only) or `--verbose` (debug, trace)
//! 3. Info
//!
//! Progress lines (`scanned N files`) and index file provenance are logged
//! at info level, so `--quiet` hides them.

use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Install the global logger.
///
/// Returns `false` if a logger was already installed; the existing logger is
/// kept in that case.
///
/// # Example
///
/// ```rust,no_run
/// use dupeindex::logging::init_logging;
///
/// init_logging(1, false);
/// log::debug!("visible with -v");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> bool {
    let from_env = std::env::var_os("RUST_LOG").is_some();
    let level = level_for(verbose, quiet);

    let mut builder = Builder::new();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(level);
    }
    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        let timestamp = buf.timestamp_seconds();
        if cfg!(debug_assertions) && verbose > 0 {
            writeln!(
                buf,
                "{timestamp} {style}{level:<5}{style:#} [{}] {}",
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else if cfg!(debug_assertions) {
            writeln!(buf, "{timestamp} {style}{level:<5}{style:#} {}", record.args())
        } else {
            writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
        }
    });

    let installed = builder.try_init().is_ok();
    if installed && !from_env {
        log::debug!("Logging initialized at level: {:?}", level);
    }
    installed
}

/// Map CLI flags to a level filter; `quiet` wins over `verbose`.
fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}
