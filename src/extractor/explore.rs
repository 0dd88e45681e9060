//! Builds the structured [`Record`] from a parsed note page.

use chrono::{Local, TimeZone};
use tracing::debug;

use super::page::NotePage;
use crate::record::{Record, WorkKind};

/// Runs extraction from the typed intermediate into a [`Record`].
///
/// Returns `None` when the page carries no usable note; download addresses
/// are filled in later by the kind-specific extractors, and the collection
/// timestamp at persistence time.
#[must_use]
pub fn build_record(page: &NotePage) -> Option<Record> {
    if page.note_id.is_empty() {
        debug!("note page has no work id; nothing to extract");
        return None;
    }

    Some(Record {
        work_id: page.note_id.clone(),
        kind: WorkKind::from_tag(&page.note_type),
        author_id: page.user.user_id.clone(),
        author_name: page.user.nickname.clone(),
        title: page.title.clone(),
        publish_time: render_publish_time(page.time),
        download_urls: Vec::new(),
        collected_at: String::new(),
    })
}

/// Renders a millisecond epoch timestamp as local `YYYY-MM-DD HH:MM:SS`.
///
/// A zero or unrepresentable timestamp renders as an empty string; the
/// naming key falls back accordingly.
fn render_publish_time(millis: i64) -> String {
    if millis <= 0 {
        return String::new();
    }
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::page::{parse_page, tests::page_with_note, tests::VIDEO_NOTE};
    use super::*;

    #[test]
    fn test_build_record_from_video_note() {
        let page = parse_page(&page_with_note(VIDEO_NOTE)).unwrap();
        let record = build_record(&page).unwrap();
        assert_eq!(record.work_id, "abc123");
        assert_eq!(record.kind, WorkKind::Video);
        assert_eq!(record.author_id, "u1");
        assert_eq!(record.author_name, "rider");
        assert_eq!(record.title, "Sunset ride");
        assert!(record.download_urls.is_empty(), "addresses come later");
        assert!(record.collected_at.is_empty(), "stamped at persistence");
    }

    #[test]
    fn test_build_record_requires_work_id() {
        let page = NotePage::default();
        assert!(build_record(&page).is_none());
    }

    #[test]
    fn test_publish_time_format() {
        let rendered = render_publish_time(1_700_000_000_000);
        // Exact value depends on local offset; shape must be stable.
        assert_eq!(rendered.len(), 19);
        assert_eq!(&rendered[4..5], "-");
        assert_eq!(&rendered[10..11], " ");
        assert_eq!(&rendered[13..14], ":");
    }

    #[test]
    fn test_publish_time_zero_is_empty() {
        assert_eq!(render_publish_time(0), "");
        assert_eq!(render_publish_time(-5), "");
    }
}
