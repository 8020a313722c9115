//! Rendering of results for standard output.
//!
//! Line output is what `du -h` and `curl | wc -c` would print. When the
//! `--json` flag is passed, the serializable structures below are printed as
//! a single JSON object instead.

use humansize::{DECIMAL, format_size};
use serde::Serialize;

use crate::config::SizeMode;
use crate::error::WalkWarning;
use crate::fetch::FetchResult;
use crate::usage::DiskUsageEntry;
use crate::utils::format_du_size;

/// `<size>\t<name>`, as printed by `du -h`.
#[must_use]
pub fn usage_line(entry: &DiskUsageEntry) -> String {
    format!("{}\t{}", format_du_size(entry.size_bytes), entry.name)
}

/// JSON document emitted by `du --json`.
#[derive(Serialize, Debug)]
pub struct JsonUsageOutput {
    /// Directory whose entries were matched.
    pub base_dir: String,

    pub pattern: String,

    pub size_mode: SizeMode,

    /// Matched entries in discovery order.
    pub entries: Vec<JsonUsageEntry>,

    /// Sum of all entry sizes in bytes.
    pub total_size: u64,

    /// Human-readable formatted total (e.g. `"1.23 MB"`).
    pub total_size_formatted: String,

    /// Entries skipped or partially sized.
    pub warnings: Vec<WalkWarning>,
}

/// A single entry in [`JsonUsageOutput`].
#[derive(Serialize, Debug)]
pub struct JsonUsageEntry {
    pub name: String,
    pub path: String,
    pub size: u64,

    /// `du -h` style size (e.g. `"4.0K"`).
    pub size_formatted: String,
    pub is_dir: bool,
}

impl From<&DiskUsageEntry> for JsonUsageEntry {
    fn from(entry: &DiskUsageEntry) -> Self {
        Self {
            name: entry.name.clone(),
            path: entry.path.display().to_string(),
            size: entry.size_bytes,
            size_formatted: format_du_size(entry.size_bytes),
            is_dir: entry.is_dir,
        }
    }
}

impl JsonUsageOutput {
    /// Build the document from a finished enumeration.
    #[must_use]
    pub fn new(
        base_dir: String,
        pattern: String,
        size_mode: SizeMode,
        entries: &[DiskUsageEntry],
        warnings: Vec<WalkWarning>,
    ) -> Self {
        let total_size = entries
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.size_bytes));

        Self {
            base_dir,
            pattern,
            size_mode,
            entries: entries.iter().map(JsonUsageEntry::from).collect(),
            total_size,
            total_size_formatted: format_size(total_size, DECIMAL),
            warnings,
        }
    }
}

/// JSON document emitted by `sizeof --json`.
#[derive(Serialize, Debug)]
pub struct JsonFetchOutput {
    pub url: String,
    pub final_url: String,
    pub status: u16,
    pub redirects: usize,
    pub byte_length: u64,

    /// Human-readable formatted length (e.g. `"1.23 MB"`).
    pub byte_length_formatted: String,
}

impl From<&FetchResult> for JsonFetchOutput {
    fn from(result: &FetchResult) -> Self {
        Self {
            url: result.url.to_string(),
            final_url: result.final_url.to_string(),
            status: result.status,
            redirects: result.redirects,
            byte_length: result.byte_length,
            byte_length_formatted: format_size(result.byte_length, DECIMAL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(name: &str, size: u64) -> DiskUsageEntry {
        DiskUsageEntry {
            name: name.to_string(),
            path: PathBuf::from("/home/u").join(name),
            size_bytes: size,
            is_dir: false,
        }
    }

    #[test]
    fn test_usage_line() {
        assert_eq!(usage_line(&entry(".bashrc", 220)), "220B\t.bashrc");
        assert_eq!(usage_line(&entry(".git", 1_258_291)), "1.2M\t.git");
    }

    #[test]
    fn test_json_usage_output_totals() {
        let entries = vec![entry(".a", 1000), entry(".b", 500)];
        let warnings = vec![WalkWarning::PermissionDenied {
            path: PathBuf::from("/home/u/.c"),
        }];

        let output = JsonUsageOutput::new(
            "/home/u".to_string(),
            ".*".to_string(),
            SizeMode::Apparent,
            &entries,
            warnings,
        );

        assert_eq!(output.total_size, 1500);
        assert!(output.total_size_formatted.starts_with("1.5"));
        assert!(output.total_size_formatted.ends_with("kB"));
        assert_eq!(output.entries.len(), 2);
        assert_eq!(output.entries[1].size_formatted, "500B");

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["size_mode"], "apparent");
        assert_eq!(json["warnings"][0]["kind"], "permission_denied");
        assert_eq!(json["entries"][0]["name"], ".a");
    }

    #[test]
    fn test_json_fetch_output() {
        let result = FetchResult {
            url: "http://a/x".parse().unwrap(),
            final_url: "http://a/y".parse().unwrap(),
            status: 200,
            byte_length: 2_000_000,
            redirects: 1,
        };

        let output = JsonFetchOutput::from(&result);
        assert_eq!(output.url, "http://a/x");
        assert_eq!(output.final_url, "http://a/y");
        assert!(output.byte_length_formatted.ends_with("MB"));
    }
}
