//! Command-line interface definition and argument parsing.
//!
//! This module defines all command-line arguments, options, and their validation
//! using the [clap](https://docs.rs/clap/) library.
//!
//! Helper methods accept a [`FileConfig`] reference so that config-file values
//! act as defaults that CLI arguments can override (layered config).

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use sizekit::config::fetch::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT, default_user_agent,
};
use sizekit::config::file::{FileConfig, expand_tilde};
use sizekit::config::usage::DEFAULT_PATTERN;
use sizekit::config::{FetchOptions, SizeMode, UsageOptions};

/// Arguments for `sizeof`.
#[derive(Args)]
pub struct SizeofArgs {
    /// Absolute http(s) URL to fetch
    pub url: String,

    /// Give up after this many seconds (redirects included)
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of redirects to follow
    #[arg(long)]
    max_redirects: Option<usize>,

    /// Print a JSON object instead of the bare byte count
    #[arg(long)]
    pub json: bool,

    /// Do not draw a progress spinner
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Arguments for `du`.
#[derive(Args)]
pub struct DuArgs {
    /// Glob matched against entry names; `*` and `?` also match dotfiles
    ///
    /// Defaults to `.*`, every dot-prefixed entry. `.` and `..` never match.
    pattern: Option<String>,

    /// Directory whose entries are matched (defaults to the current directory)
    #[arg(short = 'C', long)]
    dir: Option<PathBuf>,

    /// Report apparent sizes (byte lengths) instead of allocated blocks
    #[arg(short = 'b', long)]
    apparent_size: bool,

    /// The number of threads to use for sizing directories
    ///
    /// A value of 0 uses the default number of threads (typically the number of CPU cores).
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Exit with an error when no entry matches
    #[arg(long)]
    fail_on_empty: bool,

    /// Print a single JSON object instead of one line per entry
    #[arg(long)]
    pub json: bool,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a URL (following redirects) and print the number of bytes received
    Sizeof(SizeofArgs),

    /// Print the disk usage of each entry matching a glob, dotfiles included
    Du(DuArgs),

    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Subcommands for `config`.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file values + defaults for unset keys)
    Show,
    /// Write a default config.toml if none exists yet
    Init,
    /// Print the path to the config file
    Path,
}

/// Main command-line interface structure.
#[derive(Parser)]
#[command(name = "sizekit")]
#[command(about = "Measure the byte length of a URL or the disk usage of matching entries")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug diagnostics on stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

impl Cli {
    /// Whether debug diagnostics are enabled.
    ///
    /// The CLI flag (if set) takes priority, then the config file, then `false`.
    #[must_use]
    pub fn verbose(&self, config: &FileConfig) -> bool {
        self.verbose || config.verbose.unwrap_or(false)
    }
}

impl SizeofArgs {
    /// Extract fetch options from CLI args and config file.
    ///
    /// Priority: CLI argument > config file > hardcoded default. The connect
    /// timeout and user agent can only be set in the config file.
    #[must_use]
    pub fn fetch_options(&self, config: &FileConfig) -> FetchOptions {
        FetchOptions {
            timeout: self
                .timeout
                .or(config.fetch.timeout_secs)
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
            connect_timeout: config
                .fetch
                .connect_timeout_secs
                .map_or(DEFAULT_CONNECT_TIMEOUT, Duration::from_secs),
            max_redirects: self
                .max_redirects
                .or(config.fetch.max_redirects)
                .unwrap_or(DEFAULT_MAX_REDIRECTS),
            user_agent: config
                .fetch
                .user_agent
                .clone()
                .unwrap_or_else(default_user_agent),
        }
    }
}

impl DuArgs {
    /// Extract disk-usage options from CLI args and config file.
    ///
    /// - **pattern / dir / threads**: CLI > config > default
    /// - **apparent_size / fail_on_empty**: CLI flag `||` config value `||` `false`
    ///
    /// Tilde expansion is applied to a `dir` originating from the config file.
    #[must_use]
    pub fn usage_options(&self, config: &FileConfig) -> UsageOptions {
        let apparent = self.apparent_size || config.usage.apparent_size.unwrap_or(false);

        UsageOptions {
            pattern: self
                .pattern
                .clone()
                .or_else(|| config.usage.pattern.clone())
                .unwrap_or_else(|| DEFAULT_PATTERN.to_string()),
            dir: self
                .dir
                .clone()
                .or_else(|| config.usage.dir.as_deref().map(expand_tilde)),
            size_mode: if apparent {
                SizeMode::Apparent
            } else {
                SizeMode::Allocated
            },
            threads: self.threads.or(config.usage.threads).unwrap_or(0),
            fail_on_empty: self.fail_on_empty || config.usage.fail_on_empty.unwrap_or(false),
        }
    }
}
