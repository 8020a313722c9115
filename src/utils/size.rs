//! Size measurement and formatting utilities.
//!
//! This module provides the per-entry size accounting used by the disk-usage
//! walker, and the compact `du -h` style formatting used for line output.

use std::fs::Metadata;

use crate::config::SizeMode;

const UNITS: [&str; 6] = ["K", "M", "G", "T", "P", "E"];

/// Size contributed by a single filesystem entry, its children excluded.
///
/// `metadata` must come from `symlink_metadata` so that a link is measured
/// by itself and never by its target.
///
/// - [`SizeMode::Allocated`]: allocated blocks on Unix (directories and
///   symlinks included), apparent length elsewhere.
/// - [`SizeMode::Apparent`]: byte length of anything that is not a directory.
#[must_use]
pub fn entry_size(metadata: &Metadata, mode: SizeMode) -> u64 {
    match mode {
        SizeMode::Apparent => {
            if metadata.is_dir() {
                0
            } else {
                metadata.len()
            }
        }
        SizeMode::Allocated => allocated_size(metadata),
    }
}

#[cfg(unix)]
fn allocated_size(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;

    // st_blocks is always in 512-byte units, whatever the filesystem block size
    metadata.blocks().saturating_mul(512)
}

#[cfg(not(unix))]
fn allocated_size(metadata: &Metadata) -> u64 {
    metadata.len()
}

/// Format a byte count the way `du -h` does.
///
/// Values below 1 KiB are printed as bytes with a `B` suffix. Larger values
/// use binary units and are rounded up: one decimal place below 10, whole
/// numbers from 10 upward.
///
/// # Examples
///
/// ```
/// # use sizekit::utils::format_du_size;
/// assert_eq!(format_du_size(220), "220B");
/// assert_eq!(format_du_size(4096), "4.0K");
/// assert_eq!(format_du_size(12 * 1024 * 1024), "12M");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_du_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes}B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if value < 10.0 {
        let tenths = (value * 10.0).ceil() / 10.0;
        if tenths < 10.0 {
            return format!("{tenths:.1}{}", UNITS[unit]);
        }
        value = tenths;
    }

    let whole = value.ceil();
    if whole >= 1024.0 && unit < UNITS.len() - 1 {
        return format!("1.0{}", UNITS[unit + 1]);
    }

    format!("{whole:.0}{}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_format_du_size_bytes() {
        assert_eq!(format_du_size(0), "0B");
        assert_eq!(format_du_size(220), "220B");
        assert_eq!(format_du_size(1023), "1023B");
    }

    #[test]
    fn test_format_du_size_small_units_keep_one_decimal() {
        assert_eq!(format_du_size(1024), "1.0K");
        assert_eq!(format_du_size(4096), "4.0K");
        assert_eq!(format_du_size(1536), "1.5K");
        assert_eq!(format_du_size(1_258_291), "1.2M");
    }

    #[test]
    fn test_format_du_size_rounds_up() {
        // 1025 bytes is just over 1.0K, du rounds up
        assert_eq!(format_du_size(1025), "1.1K");
        // 9.99K rounds up to a whole 10K
        assert_eq!(format_du_size(10 * 1024 - 1), "10K");
    }

    #[test]
    fn test_format_du_size_whole_numbers_from_ten() {
        assert_eq!(format_du_size(12 * 1024 * 1024), "12M");
        assert_eq!(format_du_size(100 * 1024), "100K");
        assert_eq!(format_du_size(3 * 1024 * 1024 * 1024), "3.0G");
    }

    #[test]
    fn test_format_du_size_carries_into_next_unit() {
        assert_eq!(format_du_size(1024 * 1024 - 1), "1.0M");
    }

    #[test]
    fn test_format_du_size_max() {
        assert!(format_du_size(u64::MAX).ends_with('E'));
    }

    #[test]
    fn test_entry_size_apparent() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, "hello").unwrap();

        let meta = fs::symlink_metadata(&file).unwrap();
        assert_eq!(entry_size(&meta, SizeMode::Apparent), 5);

        let dir_meta = fs::symlink_metadata(tmp.path()).unwrap();
        assert_eq!(entry_size(&dir_meta, SizeMode::Apparent), 0);
    }

    #[test]
    #[cfg(unix)]
    fn test_entry_size_allocated_matches_blocks() {
        use std::os::unix::fs::MetadataExt;

        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("b.bin");
        fs::write(&file, vec![1u8; 10_000]).unwrap();

        let meta = fs::symlink_metadata(&file).unwrap();
        assert_eq!(entry_size(&meta, SizeMode::Allocated), meta.blocks() * 512);
    }
}
