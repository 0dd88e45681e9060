//! Video download address extraction.

use tracing::debug;

use super::page::NotePage;

/// Computes the download addresses for a video work.
///
/// AVC renditions are preferred; HEVC is the fallback when no AVC rendition
/// carries an address. At most one address is returned since the platform's
/// first rendition is the full-quality master.
#[must_use]
pub fn video_urls(page: &NotePage) -> Vec<String> {
    let Some(video) = &page.video else {
        debug!(work_id = %page.note_id, "video note carries no video payload");
        return Vec::new();
    };

    let stream = &video.media.stream;
    stream
        .h264
        .iter()
        .chain(stream.h265.iter())
        .map(|item| item.master_url.as_str())
        .find(|url| !url.is_empty())
        .map(|url| vec![url.to_string()])
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::page::{parse_page, tests::page_with_note, tests::VIDEO_NOTE};
    use super::*;

    #[test]
    fn test_video_urls_prefers_h264_master() {
        let page = parse_page(&page_with_note(VIDEO_NOTE)).unwrap();
        assert_eq!(
            video_urls(&page),
            vec!["https://sns-video.xhscdn.com/stream/abc.mp4"]
        );
    }

    #[test]
    fn test_video_urls_falls_back_to_h265() {
        let note = r#"{
            "noteId": "abc123", "type": "video", "time": 1,
            "user": {"userId": "u", "nickname": "n"},
            "video": {"media": {"stream": {
                "h264": [{"masterUrl": ""}],
                "h265": [{"masterUrl": "https://sns-video.xhscdn.com/stream/hevc.mp4"}]
            }}}
        }"#;
        let page = parse_page(&page_with_note(note)).unwrap();
        assert_eq!(
            video_urls(&page),
            vec!["https://sns-video.xhscdn.com/stream/hevc.mp4"]
        );
    }

    #[test]
    fn test_video_urls_missing_payload_is_empty() {
        let note = r#"{"noteId": "abc123", "type": "video", "time": 1,
                       "user": {"userId": "u", "nickname": "n"}}"#;
        let page = parse_page(&page_with_note(note)).unwrap();
        assert!(video_urls(&page).is_empty());
    }
}
