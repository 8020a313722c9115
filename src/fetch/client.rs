//! HTTP capability used by [`ResourceSizer`](super::ResourceSizer).
//!
//! A client performs exactly one request per call and never follows
//! redirects; the sizer owns the redirect policy.

use std::error::Error as _;
use std::future::Future;

use reqwest::{StatusCode, header::LOCATION, redirect};
use url::Url;

use crate::config::FetchOptions;
use crate::error::FetchError;

/// What one GET request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,

    /// Raw `Location` header, if any
    pub location: Option<String>,

    /// Bytes of body received after transport decoding
    pub body_len: u64,
}

impl HttpResponse {
    /// The `Location` to follow, if this response is a redirect hop.
    ///
    /// A 3xx without a `Location` header is a final response.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        if self.status.is_redirection() {
            self.location.as_deref()
        } else {
            None
        }
    }
}

/// One-shot GET capability.
pub trait HttpClient {
    /// Issue a single GET for `url` and read the whole body.
    fn get(&self, url: &Url) -> impl Future<Output = Result<HttpResponse, FetchError>> + Send;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    http: reqwest::Client,
}

impl ReqwestClient {
    /// Build a client that does not follow redirects.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] if the TLS backend cannot be initialised.
    pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .connect_timeout(options.connect_timeout)
            .user_agent(options.user_agent.clone())
            .build()
            .map_err(|e| FetchError::network("", describe(&e)))?;

        Ok(Self { http })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &Url) -> impl Future<Output = Result<HttpResponse, FetchError>> + Send {
        let request = self.http.get(url.clone());
        let target = url.to_string();

        async move {
            let mut response = request
                .send()
                .await
                .map_err(|e| FetchError::network(&target, describe(&e)))?;

            let status = response.status();
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);

            let mut body_len = 0u64;
            while let Some(chunk) = response
                .chunk()
                .await
                .map_err(|e| FetchError::network(&target, describe(&e)))?
            {
                body_len += chunk.len() as u64;
            }

            Ok(HttpResponse {
                status,
                location,
                body_len,
            })
        }
    }
}

/// Flatten a reqwest error and its source chain into one line.
fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        return "operation timed out".to_string();
    }

    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
