//! Disk usage of glob-matched directory entries.
//!
//! ## Main Parts
//!
//! - [`GlobDiskUsage`] - matches entry names in a base directory and sizes each one
//! - [`DiskUsage`] - the lazy sequence of [`DiskUsageEntry`] values it produces
//! - [`FilesystemWalker`] - listing and recursive sizing capability
//! - [`NativeWalker`] - the real-filesystem walker (walkdir + rayon)
//! - [`EntryPattern`] - glob matching that includes dotfiles and never matches `.` or `..`
//!
//! Symlinks are never followed: a link contributes its own size only.

pub mod enumerate;
pub mod pattern;
pub mod walker;

pub use crate::config::SizeMode;
pub use enumerate::{DiskUsage, DiskUsageEntry, GlobDiskUsage};
pub use pattern::EntryPattern;
pub use walker::{DirNames, FilesystemWalker, NativeWalker, Tally};
