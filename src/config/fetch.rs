//! Options for fetching a resource.

use std::time::Duration;

/// Redirect hops followed before giving up.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Upper bound for a whole fetch, redirects included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for establishing one connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`ResourceSizer`](crate::fetch::ResourceSizer) and
/// [`ReqwestClient`](crate::fetch::ReqwestClient).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    /// Deadline for the whole call, all redirect hops included
    pub timeout: Duration,

    /// Deadline for establishing each connection
    pub connect_timeout: Duration,

    /// Maximum number of redirect hops to follow
    pub max_redirects: usize,

    /// `User-Agent` header sent with every request
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: default_user_agent(),
        }
    }
}

/// `sizekit/<version>`.
#[must_use]
pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
