//! Configuration management

mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

impl Config {
    /// Load configuration from a file or default location.
    ///
    /// A missing file yields defaults. Unreadable files and invalid JSON are
    /// errors here; use [`Config::load_or_default`] to recover from them.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = resolve_path(path)?;

        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        Ok(Self::from_value(&value))
    }

    /// Load configuration, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using default configuration", e);
                Self::default()
            }
        }
    }

    /// Save configuration to a file (with advisory file locking)
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = resolve_path(path)?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        // Use a lockfile to prevent concurrent writes
        let lock_path = config_path.with_extension("json.lock");
        let lock_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;

        use fs2::FileExt;
        lock_file
            .lock_exclusive()
            .with_context(|| "Failed to acquire config file lock")?;

        let result = std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {}", config_path.display()));

        let _ = FileExt::unlock(&lock_file);

        result
    }

    /// Get the default config file path.
    /// Uses the platform config directory, falling back to ~/.config
    pub fn default_path() -> Option<PathBuf> {
        let config_base =
            dirs::config_dir().or_else(|| dirs::home_dir().map(|d| d.join(".config")))?;
        Some(config_base.join("filerouter").join("config.json"))
    }
}

fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
    path.map(PathBuf::from)
        .or_else(Config::default_path)
        .context("Could not determine config path")
}
