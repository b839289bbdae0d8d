//! dupeindex - Content-Addressed File Index
//!
//! Walks a directory tree, hashes every file and groups the files by content
//! so duplicates can be found by key lookup. The resulting index can be
//! written to and read from a gzip-compressed JSON file.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod progress;
pub mod scanner;
pub mod store;

pub use app::run_app;
