//! Embedded page-state extraction into a typed intermediate structure.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

/// Marker preceding the embedded state blob in the served page.
const STATE_MARKER: &str = "window.__INITIAL_STATE__=";

/// Typed intermediate for one note, validated at the parse boundary.
///
/// Every field the platform may omit is defaulted; downstream code decides
/// what absence means instead of panicking on missing keys.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotePage {
    /// Platform-assigned work ID
    pub note_id: String,
    /// Raw type tag as served (`"video"`, `"normal"`, ...)
    #[serde(rename = "type")]
    pub note_type: String,
    /// Work title; may be empty
    pub title: String,
    /// Publish time in milliseconds since the epoch
    pub time: i64,
    /// Author info
    pub user: NoteUser,
    /// Image entries, in platform order
    pub image_list: Vec<NoteImage>,
    /// Video payload, present for video works only
    pub video: Option<NoteVideo>,
}

/// Author fields of a note.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoteUser {
    /// Author's account ID
    pub user_id: String,
    /// Author's display name
    pub nickname: String,
}

/// One image entry of an image-set note.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoteImage {
    /// CDN URL of the default rendition
    pub url_default: String,
}

/// Video payload of a video note.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoteVideo {
    /// Media container holding the stream variants
    pub media: NoteMedia,
}

/// Media container of a video note.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoteMedia {
    /// Stream variants by codec
    pub stream: NoteStream,
}

/// Stream variants by codec, each a list of renditions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NoteStream {
    /// AVC renditions, preferred
    pub h264: Vec<NoteStreamItem>,
    /// HEVC renditions, fallback
    pub h265: Vec<NoteStreamItem>,
}

/// One stream rendition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoteStreamItem {
    /// Direct download address of this rendition
    pub master_url: String,
}

/// Parses raw page content into a [`NotePage`].
///
/// Returns `None` when the state marker is absent, the blob is not valid
/// JSON after `undefined` → `null` rewriting, or no note entry is present.
/// Callers treat `None` as a recoverable per-link parse failure.
#[must_use]
pub fn parse_page(html: &str) -> Option<NotePage> {
    let blob = locate_state_blob(html)?;
    // The server serializes JS object literals; bare `undefined` values are
    // legal there but not in JSON.
    let blob = blob.replace("undefined", "null");
    let state: Value = serde_json::from_str(&blob).ok()?;
    trace!(bytes = blob.len(), "state blob parsed");

    let detail_map = state.get("note")?.get("noteDetailMap")?.as_object()?;
    let note = detail_map.values().next()?.get("note")?;
    let page: NotePage = serde_json::from_value(note.clone()).ok()?;

    if page.note_id.is_empty() {
        debug!("state blob carries no note id");
        return None;
    }
    Some(page)
}

/// Cuts the raw JSON blob out of the page text.
fn locate_state_blob(html: &str) -> Option<&str> {
    let start = html.find(STATE_MARKER)? + STATE_MARKER.len();
    let rest = &html[start..];
    let end = rest.find("</script>").unwrap_or(rest.len());
    let blob = rest[..end].trim();
    (!blob.is_empty()).then_some(blob)
}
