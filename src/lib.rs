//! XHS Downloader Core Library
//!
//! This library extracts structured metadata and media download links from
//! shared xiaohongshu links, optionally downloads the referenced files, and
//! records one row per processed work.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`app`] - Orchestrator, clipboard monitor, and settings
//! - [`links`] - Link recognition and short-link resolution
//! - [`net`] - Page fetch and redirect resolution over HTTP
//! - [`extractor`] - Page state parsing and media address extraction
//! - [`download`] - Multi-file downloader with bounded retry
//! - [`store`] - SQLite-backed dedup store and record writer
//! - [`db`] - Database connection and schema management
//! - [`clipboard`] - Clipboard reader seam for monitor mode

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod clipboard;
pub mod db;
pub mod download;
pub mod extractor;
pub mod links;
pub mod net;
pub mod record;
pub mod store;

// Re-export commonly used types
pub use app::{ImageFormat, Settings, SettingsError, Xhs, XhsError, naming_key};
pub use clipboard::{ClipboardError, ClipboardReader, SystemClipboard};
pub use db::Database;
pub use download::{DownloadError, Downloader, RetryPolicy};
pub use links::{FULL_SHAPE, LinkResolver, SHARE_SHAPE, SHORT_SHAPE, work_id_from_link};
pub use net::{FetchError, Html, PageFetcher};
pub use record::{DownloadOutcome, Record, WorkKind};
pub use store::{IdStore, RecordWriter, StoreError};
