//! Multi-file downloader for one work's media addresses.
//!
//! Downloads every address of a work to disk, streaming response bodies
//! through a `.part` file that is renamed only on completion. Each file gets
//! a bounded number of attempts with jittered exponential backoff; files
//! already on disk count as successes so interrupted works can be re-run.
//! The per-file results feed the [`DownloadOutcome`] that gates the dedup
//! store.

mod filename;
mod retry;

pub use filename::sanitize_name;
pub use retry::{DEFAULT_MAX_RETRY, RetryPolicy};

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, instrument, warn};

use crate::extractor::ImageFormat;
use crate::net::DEFAULT_USER_AGENT;
use crate::record::{DownloadOutcome, WorkKind};

/// Download errors for a single file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// HTTP client construction failed.
    #[error("failed to build download client: {0}")]
    Build(#[source] reqwest::Error),

    /// Transport-level failure (DNS, TLS, timeout, dropped body).
    #[error("request to {url} failed: {source}")]
    Request {
        /// Requested address
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status.
    #[error("request to {url} returned HTTP {status}")]
    Status {
        /// Requested address
        url: String,
        /// Response status code
        status: u16,
    },

    /// Local file system failure.
    #[error("file operation on {path} failed: {source}")]
    Io {
        /// Affected path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Downloads a work's files under a deterministic naming key.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    root: PathBuf,
    retry: RetryPolicy,
    folder_mode: bool,
}

impl Downloader {
    /// Creates a downloader writing beneath `root`.
    ///
    /// With `folder_mode` enabled every work gets its own subfolder named
    /// after the naming key; otherwise files land directly in `root`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Build`] when client construction fails.
    pub fn new(
        root: impl Into<PathBuf>,
        user_agent: Option<&str>,
        proxy: Option<&str>,
        timeout_secs: u64,
        retry: RetryPolicy,
        folder_mode: bool,
    ) -> Result<Self, DownloadError> {
        let mut builder = Client::builder()
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .gzip(true);
        if let Some(proxy) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy).map_err(DownloadError::Build)?);
        }
        let client = builder.build().map_err(DownloadError::Build)?;

        Ok(Self {
            client,
            root: root.into(),
            retry,
            folder_mode,
        })
    }

    /// Directory that downloads for the given naming key land in.
    #[must_use]
    pub fn target_dir(&self, naming_key: &str) -> PathBuf {
        if self.folder_mode {
            self.root.join(naming_key)
        } else {
            self.root.clone()
        }
    }

    /// Downloads every address of one work.
    ///
    /// Never errors to the caller: each per-file failure is logged and noted
    /// as a `false` flag in the returned outcome, in address order.
    #[instrument(skip(self, urls), fields(files = urls.len(), naming_key))]
    pub async fn run(
        &self,
        urls: &[String],
        naming_key: &str,
        kind: WorkKind,
        format: ImageFormat,
    ) -> DownloadOutcome {
        let mut outcome = DownloadOutcome::new();

        let dir = self.target_dir(naming_key);
        if let Err(source) = tokio::fs::create_dir_all(&dir).await {
            error!(dir = %dir.display(), error = %source, "cannot create download directory");
            for _ in urls {
                outcome.push(false);
            }
            return outcome;
        }

        let extension = match kind {
            WorkKind::Video => ".mp4",
            WorkKind::ImageSet => format.extension(),
            WorkKind::Other => ".bin",
        };

        let bar = ProgressBar::new(urls.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(naming_key.to_string());

        for (index, url) in urls.iter().enumerate() {
            let stem = if urls.len() > 1 {
                format!("{naming_key}_{}", index + 1)
            } else {
                naming_key.to_string()
            };
            let path = dir.join(format!("{stem}{extension}"));

            if path.exists() {
                debug!(path = %path.display(), "file already on disk; counted as success");
                outcome.push(true);
                bar.inc(1);
                continue;
            }

            match self.fetch_with_retry(url, &path).await {
                Ok(()) => outcome.push(true),
                Err(e) => {
                    warn!(url, path = %path.display(), error = %e, "file download failed");
                    outcome.push(false);
                }
            }
            bar.inc(1);
        }

        bar.finish_and_clear();
        outcome
    }

    /// Runs one file through the retry policy.
    async fn fetch_with_retry(&self, url: &str, path: &Path) -> Result<(), DownloadError> {
        let mut attempt = 1u32;
        loop {
            match self.fetch_to_file(url, path).await {
                Ok(()) => return Ok(()),
                Err(e) => match self.retry.next_delay(&e, attempt) {
                    Some(delay) => {
                        warn!(
                            url,
                            attempt,
                            max_attempts = self.retry.max_attempts(),
                            delay_ms = delay.as_millis(),
                            error = %e,
                            "retrying file download"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(e),
                },
            }
        }
    }

    /// Streams one response body to `<path>.part`, then renames into place.
    async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<(), DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| DownloadError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let part = PathBuf::from(format!("{}.part", path.display()));
        let result = write_stream(response, &part).await;
        if result.is_err() {
            // Leave no partial file behind.
            let _ = tokio::fs::remove_file(&part).await;
            return result;
        }

        tokio::fs::rename(&part, path)
            .await
            .map_err(|source| DownloadError::Io {
                path: path.display().to_string(),
                source,
            })
    }
}

async fn write_stream(response: reqwest::Response, part: &Path) -> Result<(), DownloadError> {
    let url = response.url().to_string();
    let io_err = |source: std::io::Error| DownloadError::Io {
        path: part.display().to_string(),
        source,
    };

    let mut file = tokio::fs::File::create(part).await.map_err(io_err)?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| DownloadError::Request {
            url: url.clone(),
            source,
        })?;
        file.write_all(&chunk).await.map_err(io_err)?;
    }
    file.flush().await.map_err(io_err)?;
    Ok(())
}
