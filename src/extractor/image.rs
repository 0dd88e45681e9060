//! Image download address extraction with configurable output encoding.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use url::Url;

use super::page::NotePage;

/// Output encoding requested from the platform's image CDN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Lossless; the platform's originals are re-encoded
    #[default]
    Png,
    /// Smallest output, what the web client serves by default
    Webp,
    /// Widest compatibility
    Jpeg,
}

impl ImageFormat {
    /// Format token used in the CDN transform query.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Jpeg => "jpeg",
        }
    }

    /// On-disk file extension, including the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => ".png",
            Self::Webp => ".webp",
            Self::Jpeg => ".jpg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Computes the download addresses for an image-set work.
///
/// Each CDN URL embeds a file token as its last path segment, with the
/// rendition suffix after `!`. The token is re-targeted at the transform
/// endpoint so the CDN serves the requested encoding at original size.
/// Entries without a usable token are skipped.
#[must_use]
pub fn image_urls(page: &NotePage, format: ImageFormat) -> Vec<String> {
    page.image_list
        .iter()
        .filter_map(|image| {
            let token = image_token(&image.url_default);
            if token.is_none() {
                debug!(work_id = %page.note_id, url = %image.url_default, "image entry has no token");
            }
            token
        })
        .map(|token| format!("https://ci.xiaohongshu.com/{token}?imageView2/format/{format}"))
        .collect()
}

/// Extracts the file token from a CDN rendition URL.
fn image_token(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    let token = last.split('!').next().unwrap_or(last);
    (!token.is_empty()).then(|| token.to_string())
}
