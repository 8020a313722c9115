//! Filesystem capability used by [`GlobDiskUsage`](super::GlobDiskUsage).
//!
//! The walker knows how to list a directory and how to size one entry
//! recursively. Matching, ordering and warning delivery live in the
//! enumerator, so they can be tested against a fake walker.

use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use crate::config::SizeMode;
use crate::error::WalkWarning;
use crate::utils::entry_size;

/// Size of one matched entry plus everything that went wrong below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub bytes: u64,
    pub is_dir: bool,
    pub warnings: Vec<WalkWarning>,
}

impl Tally {
    #[must_use]
    pub const fn leaf(bytes: u64) -> Self {
        Self {
            bytes,
            is_dir: false,
            warnings: Vec::new(),
        }
    }

    /// Combine two partial tallies. Sizes add, warnings concatenate.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.bytes = self.bytes.saturating_add(other.bytes);
        self.is_dir |= other.is_dir;
        self.warnings.extend(other.warnings);
        self
    }
}

/// Directory listing and recursive sizing.
pub trait FilesystemWalker {
    /// Entry names of a directory in discovery order.
    type Names: Iterator<Item = io::Result<OsString>>;

    /// Open `dir` for listing.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if `dir` cannot be opened.
    fn list(&self, dir: &Path) -> io::Result<Self::Names>;

    /// Total size of `path` and, for a directory, everything below it.
    ///
    /// Symlinks are never followed.
    ///
    /// # Errors
    ///
    /// Returns a warning when `path` itself cannot be sized. Problems further
    /// down are reported in [`Tally::warnings`] instead.
    fn disk_usage(&self, path: &Path, cancel: &CancellationToken) -> Result<Tally, WalkWarning>;
}

/// Names yielded by [`fs::read_dir`].
#[derive(Debug)]
pub struct DirNames(fs::ReadDir);

impl Iterator for DirNames {
    type Item = io::Result<OsString>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|entry| entry.map(|e| e.file_name()))
    }
}

/// [`FilesystemWalker`] over the real filesystem.
///
/// Immediate subdirectories of a matched directory are walked in parallel on
/// the current rayon pool. Totals do not depend on the pool size.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeWalker {
    size_mode: SizeMode,
}

impl NativeWalker {
    #[must_use]
    pub const fn new(size_mode: SizeMode) -> Self {
        Self { size_mode }
    }

    #[must_use]
    pub const fn size_mode(&self) -> SizeMode {
        self.size_mode
    }

    /// Sequential walk of one subtree. Errors become warnings.
    fn walk_subtree(&self, root: &Path, cancel: &CancellationToken) -> Tally {
        let mut tally = Tally {
            is_dir: true,
            ..Tally::default()
        };

        for entry in WalkDir::new(root).follow_links(false) {
            if cancel.is_cancelled() {
                break;
            }

            match entry {
                Ok(entry) => match entry.metadata() {
                    Ok(metadata) => {
                        tally.bytes = tally
                            .bytes
                            .saturating_add(entry_size(&metadata, self.size_mode));
                    }
                    Err(err) => tally.warnings.push(warning_from_walkdir(&err, entry.path())),
                },
                Err(err) => tally.warnings.push(warning_from_walkdir(&err, root)),
            }
        }

        tally
    }
}

impl FilesystemWalker for NativeWalker {
    type Names = DirNames;

    fn list(&self, dir: &Path) -> io::Result<Self::Names> {
        fs::read_dir(dir).map(DirNames)
    }

    fn disk_usage(&self, path: &Path, cancel: &CancellationToken) -> Result<Tally, WalkWarning> {
        let metadata = fs::symlink_metadata(path).map_err(|e| WalkWarning::from_io(path, &e))?;
        let own = entry_size(&metadata, self.size_mode);

        if !metadata.is_dir() {
            return Ok(Tally::leaf(own));
        }

        let children = fs::read_dir(path).map_err(|e| WalkWarning::from_io(path, &e))?;
        let mut tally = Tally {
            bytes: own,
            is_dir: true,
            warnings: Vec::new(),
        };
        let mut subdirs: Vec<PathBuf> = Vec::new();

        for child in children {
            if cancel.is_cancelled() {
                return Ok(tally);
            }

            let child = match child {
                Ok(child) => child,
                Err(err) => {
                    tally.warnings.push(WalkWarning::from_io(path, &err));
                    continue;
                }
            };
            let child_path = child.path();

            // DirEntry::file_type and DirEntry::metadata do not traverse symlinks
            match child.file_type() {
                Ok(file_type) if file_type.is_dir() => subdirs.push(child_path),
                Ok(_) => match child.metadata() {
                    Ok(metadata) => {
                        tally.bytes = tally
                            .bytes
                            .saturating_add(entry_size(&metadata, self.size_mode));
                    }
                    Err(err) => tally.warnings.push(WalkWarning::from_io(&child_path, &err)),
                },
                Err(err) => tally.warnings.push(WalkWarning::from_io(&child_path, &err)),
            }
        }

        let nested = subdirs
            .par_iter()
            .map(|dir| self.walk_subtree(dir, cancel))
            .reduce(Tally::default, Tally::merge);

        Ok(tally.merge(nested))
    }
}

fn warning_from_walkdir(err: &walkdir::Error, fallback: &Path) -> WalkWarning {
    let path = err.path().unwrap_or(fallback);
    err.io_error().map_or_else(
        || WalkWarning::Unreadable {
            path: path.to_path_buf(),
            message: err.to_string(),
        },
        |io_err| WalkWarning::from_io(path, io_err),
    )
}
