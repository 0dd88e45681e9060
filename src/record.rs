//! Types describing one processed work and its download outcome.

use std::fmt;

use serde::Serialize;

/// Classification of a work by the kind of media it carries.
///
/// Closed set; every dispatch on work kind is an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkKind {
    /// Single video work
    Video,
    /// One or more images
    ImageSet,
    /// Anything the platform reports that is neither video nor image set
    Other,
}

impl WorkKind {
    /// Maps the platform's type tag onto a kind.
    ///
    /// Unknown tags fall through to [`WorkKind::Other`] rather than failing
    /// the pipeline.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "video" => Self::Video,
            "normal" => Self::ImageSet,
            _ => Self::Other,
        }
    }

    /// Stable label used in record rows and log lines.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::ImageSet => "image_set",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for WorkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured output for one processed work.
///
/// A record is produced for every successfully parsed work regardless of
/// download outcome. An empty record (empty `work_id`) signals total
/// extraction failure for that link.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    /// Platform-assigned work ID
    pub work_id: String,
    /// Work classification
    pub kind: WorkKind,
    /// Author's account ID
    pub author_id: String,
    /// Author's display name
    pub author_name: String,
    /// Work title
    pub title: String,
    /// Publish time, rendered `YYYY-MM-DD HH:MM:SS`
    pub publish_time: String,
    /// Media download addresses, in platform order
    pub download_urls: Vec<String>,
    /// Collection timestamp, stamped at persistence time
    pub collected_at: String,
}

impl Record {
    /// Returns true when this record marks a failed extraction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.work_id.is_empty()
    }

    /// Renders the address list as a single space-joined string.
    ///
    /// An empty list renders as an empty string, never as a missing field.
    #[must_use]
    pub fn joined_urls(&self) -> String {
        self.download_urls.join(" ")
    }
}

impl Default for Record {
    fn default() -> Self {
        Self {
            work_id: String::new(),
            kind: WorkKind::Other,
            author_id: String::new(),
            author_name: String::new(),
            title: String::new(),
            publish_time: String::new(),
            download_urls: Vec::new(),
            collected_at: String::new(),
        }
    }
}

/// Ordered per-file success flags for one work's download attempt.
#[derive(Debug, Clone, Default)]
pub struct DownloadOutcome {
    flags: Vec<bool>,
}

impl DownloadOutcome {
    /// Creates an empty outcome.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one per-file result, preserving file order.
    pub fn push(&mut self, success: bool) {
        self.flags.push(success);
    }

    /// True when every file succeeded and at least one file was attempted.
    ///
    /// The dedup store gains a work ID if and only if this returns true.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        !self.flags.is_empty() && self.flags.iter().all(|f| *f)
    }

    /// Per-file flags in attempt order.
    #[must_use]
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }
}
