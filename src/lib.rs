//! # sizekit
//!
//! Two small measuring utilities behind explicit capability traits:
//!
//! - [`fetch`] - fetch a URL (following redirects) and report the byte length
//!   of the body that was actually received.
//! - [`usage`] - enumerate the entries of a directory that match a glob
//!   pattern, dotfiles included, and report the recursive disk usage of each.
//!
//! The two halves share nothing but the error types in [`error`] and the
//! layered configuration in [`config`].

pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod usage;
pub mod utils;

pub use config::{FetchOptions, UsageOptions};
pub use error::{FetchError, WalkError, WalkWarning};
