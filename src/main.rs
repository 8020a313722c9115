//! # sizekit
//!
//! A small CLI for two measuring jobs:
//!
//! - `sizeof` fetches a URL, follows redirects, and prints how many body
//!   bytes were received
//! - `du` prints the recursive disk usage of every entry in a directory whose
//!   name matches a glob, dotfiles included
//!
//! Persistent defaults live in `~/.config/sizekit/config.toml`.
//!
//! ## Usage
//!
//! ```bash
//! # Byte length of a page, after redirects
//! sizekit sizeof https://example.com/
//!
//! # Disk usage of every dotfile in the current directory
//! sizekit du
//!
//! # Every entry of another directory, as JSON
//! sizekit du '*' -C ~/projects --json
//! ```

mod cli;

use std::process::exit;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Commands, ConfigCommand, DuArgs, SizeofArgs};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sizekit::{
    WalkWarning,
    config::FileConfig,
    fetch::ResourceSizer,
    output::{JsonFetchOutput, JsonUsageOutput, usage_line},
    usage::GlobDiskUsage,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Entry point for the sizekit application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and printing
/// any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err:#}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// # Errors
///
/// Returns fetch and walk failures, thread-pool configuration errors, and
/// JSON serialization errors.
fn inner_main() -> Result<()> {
    let args = Cli::parse();

    if let Commands::Config { command } = &args.command {
        return handle_config_command(command);
    }

    let file_config = load_config();
    init_tracing(args.verbose(&file_config));

    match &args.command {
        Commands::Sizeof(sizeof) => run_sizeof(sizeof, &file_config),
        Commands::Du(du) => run_du(du, &file_config),
        Commands::Config { command } => handle_config_command(command),
    }
}

/// Install the stderr tracing subscriber. `RUST_LOG` overrides the level.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sizekit=debug" } else { "sizekit=warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

// ── sizeof ──────────────────────────────────────────────────────────────

fn run_sizeof(args: &SizeofArgs, config: &FileConfig) -> Result<()> {
    let options = args.fetch_options(config);
    let spinner = fetch_spinner(args.quiet || args.json, &args.url);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(async {
        let sizer = ResourceSizer::from_options(options)?;
        sizer.measure(&args.url).await
    });

    spinner.finish_and_clear();
    let result = outcome?;

    if args.json {
        let output = JsonFetchOutput::from(&result);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", result.byte_length);
    }

    Ok(())
}

fn fetch_spinner(hidden: bool, url: &str) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(format!("Fetching {url}"));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

// ── du ──────────────────────────────────────────────────────────────────

fn run_du(args: &DuArgs, config: &FileConfig) -> Result<()> {
    let options = args.usage_options(config);

    if options.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build_global()?;
    }

    let usage = GlobDiskUsage::native(options.size_mode);
    let mut entries = usage.enumerate(&options.pattern, options.dir.as_deref())?;

    let matched = if args.json {
        let collected: Vec<_> = entries.by_ref().collect();
        let base_dir = entries.base_dir().display().to_string();
        let output = JsonUsageOutput::new(
            base_dir,
            options.pattern.clone(),
            options.size_mode,
            &collected,
            entries.drain_warnings(),
        );
        println!("{}", serde_json::to_string_pretty(&output)?);
        collected.len()
    } else {
        let mut count = 0;
        for entry in entries.on_warning(print_warning) {
            println!("{}", usage_line(&entry));
            count += 1;
        }
        count
    };

    if matched == 0 && options.fail_on_empty {
        bail!("no entries match '{}'", options.pattern);
    }

    Ok(())
}

fn print_warning(warning: &WalkWarning) {
    eprintln!("{} {warning}", "Warning:".yellow());
}

// ── Config subcommand ────────────────────────────────────────────────

/// Default config file template written by `config init`.
const CONFIG_TEMPLATE: &str = r#"# sizekit configuration
# All values shown are their defaults. Uncomment and change as needed.

# Print debug diagnostics on stderr
# verbose = false

[fetch]
# Give up on a fetch after this many seconds, redirects included
# timeout_secs = 30

# Give up connecting to a host after this many seconds
# connect_timeout_secs = 10

# Maximum number of redirects to follow
# max_redirects = 10

# User-Agent header sent with every request
# user_agent = "sizekit/<version>"

[usage]
# Glob matched against entry names when `du` is given no pattern
# pattern = ".*"

# Directory whose entries are matched (defaults to current directory when not set)
# dir = "."

# Report apparent sizes (byte lengths) instead of allocated blocks
# apparent_size = false

# Number of threads used to size directories (0 = all CPU cores)
# threads = 0

# Exit with an error when no entry matches
# fail_on_empty = false
"#;

/// Dispatch a `config` subcommand.
fn handle_config_command(cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Path => match FileConfig::config_path() {
            Some(path) => println!("{}", path.display()),
            None => bail!("Could not determine the config directory on this platform"),
        },
        ConfigCommand::Show => show_config()?,
        ConfigCommand::Init => init_config()?,
    }
    Ok(())
}

/// Print the effective configuration (file values merged with defaults).
fn show_config() -> Result<()> {
    let path = FileConfig::config_path();

    let (file_exists, config) = match &path {
        Some(p) if p.exists() => (true, FileConfig::load()?),
        _ => (false, FileConfig::default()),
    };

    match &path {
        Some(p) if file_exists => println!("Config file: {} (found)", p.display()),
        Some(p) => println!(
            "Config file: {} (not found - showing defaults)",
            p.display()
        ),
        None => println!("Config file: (cannot determine path on this platform)"),
    }

    println!();
    println!("{}", format_config(&config));
    Ok(())
}

/// Format a [`FileConfig`] as a human-readable table, showing defaults for `None` fields.
fn format_config(config: &FileConfig) -> String {
    fn show_str(val: Option<&str>, default: &str) -> String {
        val.map_or_else(
            || format!("\"{default}\"  (default)"),
            |v| format!("\"{v}\""),
        )
    }
    fn show_bool(val: Option<bool>, default: bool) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }
    fn show_num<T: ToString>(val: Option<T>, default: &str) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }

    let dir_str = config.usage.dir.as_ref().map_or_else(
        || "\".\"  (default)".to_string(),
        |p| format!("\"{}\"", p.display()),
    );
    let user_agent = sizekit::config::fetch::default_user_agent();

    format!(
        "\
verbose              = {verbose}

[fetch]
timeout_secs         = {timeout}
connect_timeout_secs = {connect_timeout}
max_redirects        = {max_redirects}
user_agent           = {user_agent}

[usage]
pattern              = {pattern}
dir                  = {dir}
apparent_size        = {apparent_size}
threads              = {threads}
fail_on_empty        = {fail_on_empty}",
        verbose = show_bool(config.verbose, false),
        timeout = show_num(config.fetch.timeout_secs, "30"),
        connect_timeout = show_num(config.fetch.connect_timeout_secs, "10"),
        max_redirects = show_num(config.fetch.max_redirects, "10"),
        user_agent = show_str(config.fetch.user_agent.as_deref(), &user_agent),
        pattern = show_str(config.usage.pattern.as_deref(), ".*"),
        dir = dir_str,
        apparent_size = show_bool(config.usage.apparent_size, false),
        threads = show_num(config.usage.threads, "0 (all cores)"),
        fail_on_empty = show_bool(config.usage.fail_on_empty, false),
    )
}

/// Write a default config template to the config file path if it does not exist yet.
fn init_config() -> Result<()> {
    let Some(path) = FileConfig::config_path() else {
        bail!("Could not determine the config directory on this platform");
    };

    if path.exists() {
        println!("Config file already exists at: {}", path.display());
        println!("Remove it first if you want to regenerate it.");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {e}",
                parent.display()
            )
        })?;
    }

    std::fs::write(&path, CONFIG_TEMPLATE)
        .map_err(|e| anyhow::anyhow!("Failed to write config file {}: {e}", path.display()))?;

    println!("Config file written to: {}", path.display());
    Ok(())
}

/// Load the configuration file, falling back to defaults on failure.
fn load_config() -> FileConfig {
    match FileConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            FileConfig::default()
        }
    }
}
