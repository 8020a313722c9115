//! Configuration file support for persistent settings.
//!
//! This module provides support for loading configuration from a TOML file
//! located at `~/.config/sizekit/config.toml` (or the platform-specific
//! equivalent). Configuration file values serve as defaults that can be
//! overridden by CLI arguments.
//!
//! # Layering
//!
//! The precedence order is: **CLI argument > config file > hardcoded default**.
//!
//! # Example config
//!
//! ```toml
//! verbose = false
//!
//! [fetch]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! max_redirects = 10
//! user_agent = "sizekit/0.1"
//!
//! [usage]
//! pattern = ".*"
//! dir = "~"
//! apparent_size = false
//! threads = 4
//! fail_on_empty = false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration file structure.
///
/// All fields are `Option<T>` so we can detect which values are present in the
/// config file and apply layered configuration (CLI > config file > defaults).
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    /// Whether to emit debug diagnostics
    pub verbose: Option<bool>,

    /// Fetch options
    #[serde(default)]
    pub fetch: FileFetchConfig,

    /// Disk-usage options
    #[serde(default)]
    pub usage: FileUsageConfig,
}

/// Fetch options from the configuration file.
#[derive(Deserialize, Default, Debug)]
pub struct FileFetchConfig {
    /// Deadline for a whole fetch in seconds
    pub timeout_secs: Option<u64>,

    /// Deadline for establishing a connection in seconds
    pub connect_timeout_secs: Option<u64>,

    /// Maximum redirect hops
    pub max_redirects: Option<usize>,

    /// `User-Agent` header value
    pub user_agent: Option<String>,
}

/// Disk-usage options from the configuration file.
#[derive(Deserialize, Default, Debug)]
pub struct FileUsageConfig {
    /// Default glob pattern
    pub pattern: Option<String>,

    /// Default base directory
    pub dir: Option<PathBuf>,

    /// Report apparent sizes instead of allocated blocks
    pub apparent_size: Option<bool>,

    /// Number of threads for sizing
    pub threads: Option<usize>,

    /// Exit non-zero when nothing matches
    pub fail_on_empty: Option<bool>,
}

/// Expand a leading `~` in a path to the user's home directory.
///
/// Paths that don't start with `~` are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// The configuration file is located at `<config_dir>/sizekit/config.toml`,
    /// where `<config_dir>` is the platform-specific configuration directory
    /// (e.g., `~/.config` on Linux, `%APPDATA%` on Windows).
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sizekit").join("config.toml"))
    }

    /// Load configuration from the default config file location.
    ///
    /// If the config file doesn't exist, returns a default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// contains invalid TOML.
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file at {}: {e}", path.display())
        })?;

        toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file at {}: {e}", path.display())
        })
    }
}
