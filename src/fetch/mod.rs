//! Fetch a URL and report how many bytes came back.
//!
//! ## Main Parts
//!
//! - [`ResourceSizer`] - follows redirects up to a limit and counts the final body
//! - [`HttpClient`] - the one-request capability the sizer is built on
//! - [`ReqwestClient`] - the production [`HttpClient`]
//! - [`FetchResult`] - byte length plus where it came from

pub mod client;
pub mod sizer;

pub use client::{HttpClient, HttpResponse, ReqwestClient};
pub use sizer::{FetchResult, ResourceSizer};
