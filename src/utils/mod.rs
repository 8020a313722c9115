//! Utility functions and helpers.
//!
//! This module contains helpers used throughout the crate, such as per-entry
//! size accounting and `du` style size formatting.

pub mod size;

pub use size::{entry_size, format_du_size};
