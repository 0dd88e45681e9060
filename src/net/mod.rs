//! HTTP fetch layer: page retrieval and short-link redirect resolution.
//!
//! This module centralizes networking defaults (timeout, user-agent,
//! compression, optional cookie and proxy) so every outbound request made by
//! the pipeline goes through one consistently configured client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderValue};
use reqwest::{Client, Proxy, redirect};
use thiserror::Error;
use tracing::{debug, instrument};

/// Default browser-like user agent sent with every request.
///
/// The platform serves a stripped page to unknown agents, so a realistic
/// desktop UA is required for the embedded state blob to be present.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Maximum redirect hops followed during short-link resolution.
const MAX_REDIRECTS: usize = 10;

/// Errors returned by the fetch layer.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client construction failed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request itself failed (DNS, TLS, timeout, connection).
    #[error("request to {url} failed: {source}")]
    Request {
        /// Requested URL
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("request to {url} returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// The configured cookie string is not a valid header value.
    #[error("configured cookie is not a valid header value")]
    InvalidCookie,
}

/// Abstraction over outbound page fetches.
///
/// The orchestrator and link resolver depend on this trait so tests can
/// substitute a scripted fetcher; [`Html`] is the production implementation.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the raw page content for a canonical link.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;

    /// Follows redirects from a short link and returns the final URL.
    async fn resolve_redirect(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP client for page fetches and redirect resolution.
#[derive(Debug, Clone)]
pub struct Html {
    client: Client,
    cookie: Option<HeaderValue>,
}

impl Html {
    /// Builds the client with the shared networking policy.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - UA header; `None` uses [`DEFAULT_USER_AGENT`]
    /// * `cookie` - optional raw cookie string attached to page fetches
    /// * `proxy` - optional proxy URL applied to all requests
    /// * `timeout_secs` - whole-request timeout
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Build`] when client construction fails and
    /// [`FetchError::InvalidCookie`] when the cookie string cannot be used
    /// as a header value.
    pub fn new(
        user_agent: Option<&str>,
        cookie: Option<&str>,
        proxy: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .gzip(true);

        if let Some(proxy) = proxy {
            let proxy = Proxy::all(proxy).map_err(FetchError::Build)?;
            builder = builder.proxy(proxy);
        }

        let cookie = cookie
            .map(|value| HeaderValue::from_str(value).map_err(|_| FetchError::InvalidCookie))
            .transpose()?;

        let client = builder.build().map_err(FetchError::Build)?;
        Ok(Self { client, cookie })
    }
}

#[async_trait]
impl PageFetcher for Html {
    #[instrument(skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let mut request = self.client.get(url);
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie.clone());
        }

        let response = request.send().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;
        debug!(url, bytes = body.len(), "page fetched");
        Ok(body)
    }

    #[instrument(skip(self))]
    async fn resolve_redirect(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let resolved = response.url().to_string();
        debug!(short = url, resolved = %resolved, "short link resolved");
        Ok(resolved)
    }
}
