//! Error taxonomy for fetching and walking.
//!
//! [`FetchError`] and [`WalkError`] are fatal for the call that produced them.
//! [`WalkWarning`] is not: it is reported alongside the entries of a disk-usage
//! enumeration and never ends the sequence.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Failure of a single [`ResourceSizer`](crate::fetch::ResourceSizer) call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The URL (or a redirect `Location`) is not an absolute http(s) URL.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// DNS, connect, read or timeout failure.
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The redirect chain was longer than the configured limit.
    #[error("too many redirects (limit is {limit})")]
    TooManyRedirects { limit: usize },

    /// The caller cancelled the fetch.
    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchError {
    pub(crate) fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn network(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Network {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

/// Non-fatal problem met while sizing one entry.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WalkWarning {
    #[error("cannot read '{}': permission denied", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("'{}' vanished during the walk", path.display())]
    EntryVanished { path: PathBuf },

    #[error("cannot read '{}': {message}", path.display())]
    Unreadable { path: PathBuf, message: String },
}

impl WalkWarning {
    /// Classify an I/O error raised for `path`.
    #[must_use]
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::NotFound => Self::EntryVanished { path },
            _ => Self::Unreadable {
                path,
                message: err.to_string(),
            },
        }
    }

    /// The path the warning is about.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied { path }
            | Self::EntryVanished { path }
            | Self::Unreadable { path, .. } => path,
        }
    }
}

/// Failure that prevents an enumeration from starting at all.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("base directory '{}' does not exist", path.display())]
    BaseDirNotFound { path: PathBuf },

    #[error("base directory '{}' cannot be read: {source}", path.display())]
    BaseDirNotReadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl WalkError {
    /// Classify an error raised while opening the base directory.
    #[must_use]
    pub fn from_base_dir(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::BaseDirNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::BaseDirNotReadable {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}
