//! Redirect-following byte counter.

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use super::client::{HttpClient, ReqwestClient};
use crate::config::FetchOptions;
use crate::error::FetchError;

/// Outcome of a successful [`ResourceSizer::measure`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// URL as requested
    pub url: Url,

    /// URL of the response whose body was counted
    pub final_url: Url,

    /// Status of the final response (may be non-2xx)
    pub status: u16,

    /// Bytes of body actually received
    pub byte_length: u64,

    /// Redirect hops followed
    pub redirects: usize,
}

/// Fetches a resource and reports the length of its body.
///
/// Redirects are followed here rather than in the client, so the hop limit
/// and `Location` resolution are the same for every [`HttpClient`].
///
/// A non-2xx final response is still a resource with a size: its body is
/// counted and returned, and the status is recorded in [`FetchResult`].
#[derive(Debug)]
pub struct ResourceSizer<C> {
    client: C,
    options: FetchOptions,
}

impl ResourceSizer<ReqwestClient> {
    /// Create a sizer backed by a [`ReqwestClient`] built from `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_options(options: FetchOptions) -> Result<Self, FetchError> {
        let client = ReqwestClient::new(&options)?;
        Ok(Self::new(client, options))
    }
}

impl<C: HttpClient> ResourceSizer<C> {
    #[must_use]
    pub const fn new(client: C, options: FetchOptions) -> Self {
        Self { client, options }
    }

    #[must_use]
    pub const fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Fetch `url` and return the byte length of the body received.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] if `url` (or a redirect target) is not an
    ///   absolute http(s) URL
    /// - [`FetchError::TooManyRedirects`] if more than `max_redirects` hops
    ///   are needed
    /// - [`FetchError::Network`] on transport failure or when the overall
    ///   timeout expires
    pub async fn measure(&self, url: &str) -> Result<FetchResult, FetchError> {
        self.measure_with_cancel(url, &CancellationToken::new()).await
    }

    /// Same as [`measure`](Self::measure), but gives up with
    /// [`FetchError::Cancelled`] as soon as `cancel` fires.
    ///
    /// # Errors
    ///
    /// See [`measure`](Self::measure).
    pub async fn measure_with_cancel(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<FetchResult, FetchError> {
        let start = parse_http_url(url)?;
        let timeout = self.options.timeout;

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(FetchError::Cancelled),
            outcome = tokio::time::timeout(timeout, self.follow(start)) => {
                outcome.unwrap_or_else(|_| {
                    Err(FetchError::network(url, format!("timed out after {timeout:?}")))
                })
            }
        }
    }

    async fn follow(&self, start: Url) -> Result<FetchResult, FetchError> {
        let limit = self.options.max_redirects;
        let mut current = start.clone();
        let mut redirects = 0;

        loop {
            let response = self.client.get(&current).await?;

            let Some(location) = response.redirect_target() else {
                if !response.status.is_success() {
                    warn!(url = %current, status = %response.status, "counting body of non-success response");
                }
                return Ok(FetchResult {
                    url: start,
                    final_url: current,
                    status: response.status.as_u16(),
                    byte_length: response.body_len,
                    redirects,
                });
            };

            if redirects == limit {
                return Err(FetchError::TooManyRedirects { limit });
            }

            let next = current
                .join(location)
                .map_err(|e| FetchError::invalid_url(location, e))?;
            ensure_http(&next)?;

            redirects += 1;
            debug!(from = %current, to = %next, hop = redirects, "following redirect");
            current = next;
        }
    }
}

/// Parse an absolute http(s) URL.
fn parse_http_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|e| FetchError::invalid_url(raw, e))?;
    ensure_http(&url)?;
    Ok(url)
}

fn ensure_http(url: &Url) -> Result<(), FetchError> {
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        "http" | "https" => Err(FetchError::invalid_url(url.as_str(), "missing host")),
        other => Err(FetchError::invalid_url(
            url.as_str(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}
