//! Shared test support: scripted page fetcher, clipboard script, fixtures.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use xhs_core::{ClipboardError, ClipboardReader, FetchError, PageFetcher, Settings, Xhs};

/// Fetcher serving pre-registered pages and redirects, no network.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, String>,
    redirects: HashMap<String, String>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn with_redirect(mut self, short: &str, target: &str) -> Self {
        self.redirects.insert(short.to_string(), target.to_string());
        self
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.pages.get(url).cloned().ok_or(FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }

    async fn resolve_redirect(&self, url: &str) -> Result<String, FetchError> {
        self.redirects.get(url).cloned().ok_or(FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Clipboard replaying a fixed script; repeats the final entry when
/// exhausted, so scripts usually end with `"close"`.
pub struct ScriptedClipboard {
    script: Vec<String>,
    index: usize,
}

impl ScriptedClipboard {
    pub fn new(script: &[&str]) -> Self {
        Self {
            script: script.iter().map(|s| (*s).to_string()).collect(),
            index: 0,
        }
    }
}

impl ClipboardReader for ScriptedClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        let entry = self
            .script
            .get(self.index)
            .or_else(|| self.script.last())
            .cloned()
            .unwrap_or_default();
        self.index += 1;
        Ok(entry)
    }
}

/// Shared in-memory sink for captured log output.
///
/// Install via `tracing_subscriber::fmt().with_writer(buffer.clone())` under
/// a `set_default` guard, then inspect `contents()` after the exercised call.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer poisoned")).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Serves a minimal note page embedding the given note JSON.
pub fn page_with_note(note_json: &str) -> String {
    format!(
        "<html><script>window.__INITIAL_STATE__={{\"note\":{{\"noteDetailMap\":\
         {{\"fixture\":{{\"note\":{note_json}}}}}}}}}</script></html>"
    )
}

/// A video note whose stream address points at `master_url`.
pub fn video_note_page(work_id: &str, master_url: &str) -> String {
    page_with_note(&format!(
        r#"{{
            "noteId": "{work_id}",
            "type": "video",
            "title": "Sunset ride",
            "time": 1700000000000,
            "user": {{"userId": "u1", "nickname": "rider"}},
            "video": {{"media": {{"stream": {{"h264": [{{"masterUrl": "{master_url}"}}], "h265": []}}}}}}
        }}"#
    ))
}

/// A video note without any video payload (address extraction fails).
pub fn video_note_page_without_stream(work_id: &str) -> String {
    page_with_note(&format!(
        r#"{{
            "noteId": "{work_id}",
            "type": "video",
            "title": "Sunset ride",
            "time": 1700000000000,
            "user": {{"userId": "u1", "nickname": "rider"}}
        }}"#
    ))
}

/// An image-set note with one CDN entry per token.
pub fn image_note_page(work_id: &str, tokens: &[&str]) -> String {
    let images: Vec<String> = tokens
        .iter()
        .map(|t| format!(r#"{{"urlDefault": "https://sns-webpic-qc.xhscdn.com/202311/{t}!nd_dft_wlteh_webp_3"}}"#))
        .collect();
    page_with_note(&format!(
        r#"{{
            "noteId": "{work_id}",
            "type": "normal",
            "title": "Cafe notes",
            "time": 1700000000000,
            "user": {{"userId": "u2", "nickname": "writer"}},
            "imageList": [{images}]
        }}"#,
        images = images.join(",")
    ))
}

/// Canonical explore link for a work ID.
pub fn explore_link(work_id: &str) -> String {
    format!("https://www.xiaohongshu.com/explore/{work_id}")
}

/// Opens an orchestrator over a scripted fetcher in a fresh temp workdir.
pub async fn open_app(fetcher: ScriptedFetcher) -> (Xhs, TempDir) {
    let temp = TempDir::new().expect("temp workdir");
    let settings = Settings::load_or_default(temp.path());
    let app = Xhs::open_with_fetcher(settings, Arc::new(fetcher))
        .await
        .expect("orchestrator opens");
    (app, temp)
}
