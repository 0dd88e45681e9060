//! Link recognition and canonicalization for shared xiaohongshu links.
//!
//! Free text (a message, a clipboard read, CLI arguments) is scanned token by
//! token. Short `xhslink.com` redirect links are resolved to their target
//! before shape matching; share links are tested before full explore links.
//! Resolution never errors to the caller: it returns whatever canonical links
//! it could recognize, in first-seen order, duplicates included.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{trace, warn};

use crate::net::PageFetcher;

/// Full explore link shape.
#[allow(clippy::expect_used)]
pub static FULL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://www\.xiaohongshu\.com/explore/[a-z0-9]+").expect("full shape is valid")
});

/// Share / discovery-item link shape.
#[allow(clippy::expect_used)]
pub static SHARE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://www\.xiaohongshu\.com/discovery/item/[a-z0-9]+")
        .expect("share shape is valid")
});

/// Short redirect link shape.
#[allow(clippy::expect_used)]
pub static SHORT_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://xhslink\.com/[A-Za-z0-9]+").expect("short shape is valid")
});

/// Extracts the platform-assigned work ID from a canonical link.
///
/// The ID is the last path segment of both the full and the share shape.
#[must_use]
pub fn work_id_from_link(link: &str) -> &str {
    link.rsplit('/').next().unwrap_or(link)
}

/// Recognizes and canonicalizes candidate links from free text.
#[derive(Clone)]
pub struct LinkResolver {
    fetcher: Arc<dyn PageFetcher>,
}

impl LinkResolver {
    /// Creates a resolver backed by the given fetcher for short links.
    #[must_use]
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Scans `text` and returns the canonical links it contains, in order.
    ///
    /// A short link that fails to resolve is dropped with a warning; the
    /// remaining tokens are still processed. Tokens matching no shape
    /// contribute nothing. The input text is not deduplicated.
    pub async fn resolve_links(&self, text: &str) -> Vec<String> {
        let mut links = Vec::new();

        for token in text.split_whitespace() {
            let candidate = if let Some(short) = SHORT_SHAPE.find(token) {
                match self.fetcher.resolve_redirect(short.as_str()).await {
                    Ok(resolved) => resolved,
                    Err(error) => {
                        warn!(
                            short = short.as_str(),
                            error = %error,
                            "short link resolution failed; token skipped"
                        );
                        continue;
                    }
                }
            } else {
                token.to_string()
            };

            // Share shape first; a token matching neither shape is ignored.
            if let Some(share) = SHARE_SHAPE.find(&candidate) {
                trace!(link = share.as_str(), "share link recognized");
                links.push(share.as_str().to_string());
            } else if let Some(full) = FULL_SHAPE.find(&candidate) {
                trace!(link = full.as_str(), "explore link recognized");
                links.push(full.as_str().to_string());
            }
        }

        links
    }
}
