//! Disk-usage configuration.
//!
//! This module defines the options that control which entries a disk-usage
//! enumeration matches and how their sizes are accounted.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

/// Pattern used when none is given: every dot-prefixed entry.
pub const DEFAULT_PATTERN: &str = ".*";

/// How the size of a single filesystem entry is measured.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeMode {
    /// Blocks actually allocated on disk (`st_blocks * 512`), directories
    /// included. Falls back to the apparent length off Unix.
    #[default]
    Allocated,

    /// Logical byte length of every non-directory entry
    Apparent,
}

/// Configuration for a disk-usage enumeration.
#[derive(Clone, Debug)]
pub struct UsageOptions {
    /// Glob matched against entry names in the base directory
    pub pattern: String,

    /// Base directory (None = current working directory)
    pub dir: Option<PathBuf>,

    /// Size accounting mode
    pub size_mode: SizeMode,

    /// Number of threads to use for sizing (0 = default)
    pub threads: usize,

    /// Treat an empty match set as an error
    pub fail_on_empty: bool,
}

impl Default for UsageOptions {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            dir: None,
            size_mode: SizeMode::default(),
            threads: 0,
            fail_on_empty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_options_default() {
        let opts = UsageOptions::default();

        assert_eq!(opts.pattern, ".*");
        assert!(opts.dir.is_none());
        assert_eq!(opts.size_mode, SizeMode::Allocated);
        assert_eq!(opts.threads, 0);
        assert!(!opts.fail_on_empty);
    }

    #[test]
    fn test_usage_options_clone() {
        let original = UsageOptions {
            pattern: "*".to_string(),
            dir: Some(PathBuf::from("test")),
            size_mode: SizeMode::Apparent,
            threads: 4,
            fail_on_empty: true,
        };
        let cloned = original.clone();

        assert_eq!(original.pattern, cloned.pattern);
        assert_eq!(original.dir, cloned.dir);
        assert_eq!(original.size_mode, cloned.size_mode);
        assert_eq!(original.threads, cloned.threads);
    }

    #[test]
    fn test_size_mode_from_str() {
        assert_eq!(SizeMode::from_str("allocated", true), Ok(SizeMode::Allocated));
        assert_eq!(SizeMode::from_str("Apparent", true), Ok(SizeMode::Apparent));
        assert!(SizeMode::from_str("blocks", true).is_err());
    }
}
