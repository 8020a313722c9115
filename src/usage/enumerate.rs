//! Lazy enumeration of glob-matched entries and their sizes.

use std::{
    fmt,
    iter::FusedIterator,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::pattern::EntryPattern;
use super::walker::{FilesystemWalker, NativeWalker};
use crate::config::SizeMode;
use crate::error::{WalkError, WalkWarning};

/// Disk usage of one matched entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskUsageEntry {
    /// Entry name relative to the base directory (may start with `.`)
    pub name: String,

    /// Full path of the entry
    pub path: PathBuf,

    /// Recursive size in bytes
    pub size_bytes: u64,

    pub is_dir: bool,
}

/// Enumerates entries of a directory matching a glob and sizes each one.
#[derive(Debug)]
pub struct GlobDiskUsage<W = NativeWalker> {
    walker: W,
    cancel: CancellationToken,
}

impl GlobDiskUsage<NativeWalker> {
    /// Enumerator over the real filesystem.
    #[must_use]
    pub fn native(size_mode: SizeMode) -> Self {
        Self::new(NativeWalker::new(size_mode))
    }
}

impl<W: FilesystemWalker> GlobDiskUsage<W> {
    #[must_use]
    pub fn new(walker: W) -> Self {
        Self {
            walker,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop every enumeration started from this value once `cancel` fires.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Start enumerating the entries of `base_dir` whose names match `pattern`.
    ///
    /// `base_dir` defaults to the current working directory. The returned
    /// iterator computes one entry per `next()` call.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError`] if the pattern is invalid or the base directory
    /// cannot be listed. Nothing is yielded in that case.
    pub fn enumerate(
        &self,
        pattern: &str,
        base_dir: Option<&Path>,
    ) -> Result<DiskUsage<'_, W>, WalkError> {
        let pattern = EntryPattern::new(pattern)?;

        let base = match base_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().map_err(|e| WalkError::from_base_dir(Path::new("."), e))?,
        };

        let names = self
            .walker
            .list(&base)
            .map_err(|e| WalkError::from_base_dir(&base, e))?;

        debug!(base = %base.display(), pattern = pattern.as_str(), "enumerating entries");

        Ok(DiskUsage {
            walker: &self.walker,
            cancel: self.cancel.clone(),
            pattern,
            base,
            names: Some(names),
            warnings: Vec::new(),
            on_warning: None,
        })
    }
}

/// Lazy, finite, non-restartable sequence of [`DiskUsageEntry`] values in
/// discovery order.
///
/// Entries that cannot be sized are skipped. Their warnings, and warnings
/// from deeper inside entries that were yielded, are kept for
/// [`drain_warnings`](Self::drain_warnings) or handed to the
/// [`on_warning`](Self::on_warning) callback.
pub struct DiskUsage<'a, W: FilesystemWalker> {
    walker: &'a W,
    cancel: CancellationToken,
    pattern: EntryPattern,
    base: PathBuf,
    names: Option<W::Names>,
    warnings: Vec<WalkWarning>,
    on_warning: Option<Box<dyn FnMut(&WalkWarning) + 'a>>,
}

impl<'a, W: FilesystemWalker> DiskUsage<'a, W> {
    /// Deliver warnings to `callback` as they happen instead of collecting them.
    #[must_use]
    pub fn on_warning(mut self, callback: impl FnMut(&WalkWarning) + 'a) -> Self {
        self.on_warning = Some(Box::new(callback));
        self
    }

    /// Take the warnings collected so far.
    pub fn drain_warnings(&mut self) -> Vec<WalkWarning> {
        std::mem::take(&mut self.warnings)
    }

    #[must_use]
    pub fn warnings(&self) -> &[WalkWarning] {
        &self.warnings
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    fn record(&mut self, warning: WalkWarning) {
        debug!(%warning, "walk warning");
        match self.on_warning.as_mut() {
            Some(callback) => callback(&warning),
            None => self.warnings.push(warning),
        }
    }
}

impl<W: FilesystemWalker> Iterator for DiskUsage<'_, W> {
    type Item = DiskUsageEntry;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.cancel.is_cancelled() {
                self.names = None;
                return None;
            }

            let name = match self.names.as_mut()?.next() {
                None => {
                    self.names = None;
                    return None;
                }
                Some(Err(err)) => {
                    let warning = WalkWarning::from_io(&self.base, &err);
                    self.record(warning);
                    continue;
                }
                Some(Ok(name)) => name,
            };

            let display = name.to_string_lossy().into_owned();
            if !self.pattern.matches(&display) {
                continue;
            }

            let path = self.base.join(&name);
            match self.walker.disk_usage(&path, &self.cancel) {
                Ok(tally) => {
                    for warning in tally.warnings {
                        self.record(warning);
                    }
                    if self.cancel.is_cancelled() {
                        // a partial total is not a size
                        continue;
                    }
                    return Some(DiskUsageEntry {
                        name: display,
                        path,
                        size_bytes: tally.bytes,
                        is_dir: tally.is_dir,
                    });
                }
                Err(warning) => self.record(warning),
            }
        }
    }
}

impl<W: FilesystemWalker> FusedIterator for DiskUsage<'_, W> {}

impl<W: FilesystemWalker> fmt::Debug for DiskUsage<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiskUsage")
            .field("base", &self.base)
            .field("pattern", &self.pattern.as_str())
            .field("finished", &self.names.is_none())
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}
