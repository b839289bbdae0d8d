//! Application configuration management.
//!
//! Settings are layered with figment, later layers overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the platform configuration directory
//! 3. `DUPEINDEX_*` environment variables
//! 4. CLI flags (applied by the caller)

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scanner::DEFAULT_PROGRESS_INTERVAL;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DUPEINDEX_";

/// File name of the default index file inside the cache directory.
pub const DEFAULT_INDEX_FILE_NAME: &str = "index.json.gz";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Number of files between progress notifications while walking.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,

    /// Index file used when a command is given no explicit file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_file: Option<PathBuf>,
}

fn default_progress_interval() -> usize {
    DEFAULT_PROGRESS_INTERVAL
}

impl Default for Config {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            index_file: None,
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path and
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file or an environment override holds
    /// an invalid value.
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok();
        Self::figment(path.as_deref())
            .extract::<Self>()
            .context("Failed to load configuration")?
            .validated()
    }

    /// Build the layered figment, reading TOML from `path` if given.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).only(&["progress_interval", "index_file"]))
    }

    /// Reject values the rest of the application cannot use.
    ///
    /// # Errors
    ///
    /// Returns an error if `progress_interval` is zero.
    pub fn validated(self) -> Result<Self> {
        if self.progress_interval == 0 {
            anyhow::bail!("progress_interval must be greater than 0");
        }
        Ok(self)
    }

    /// Save the configuration as TOML to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to: {}", path.display()))?;
        Ok(())
    }

    /// The index file to use: the configured one, else the default.
    ///
    /// # Errors
    ///
    /// Returns an error if no file is configured and the platform cache
    /// directory cannot be determined.
    pub fn resolve_index_file(&self) -> Result<PathBuf> {
        match self.index_file {
            Some(ref path) => Ok(path.clone()),
            None => Self::default_index_path(),
        }
    }

    /// Default index file in the platform-specific cache directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the project directories cannot be determined.
    pub fn default_index_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?
            .cache_dir()
            .join(DEFAULT_INDEX_FILE_NAME))
    }

    /// Get the default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns an error if the project directories cannot be determined.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "dupeindex", "dupeindex")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))
    }
}
