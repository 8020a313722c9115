//! Configuration types.
//!
//! Runtime options ([`FetchOptions`], [`UsageOptions`]) are plain structs built
//! by the CLI from command-line arguments layered over a [`FileConfig`].

pub mod fetch;
pub mod file;
pub mod usage;

pub use fetch::FetchOptions;
pub use file::FileConfig;
pub use usage::{SizeMode, UsageOptions};
