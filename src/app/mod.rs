//! Orchestration pipeline: link resolution, per-work processing, download
//! gate, and record persistence.
//!
//! [`Xhs`] is the public entry point. One instance is constructed explicitly
//! per process (no global state) and passed by reference to all callers; it
//! owns the persistence collaborators for its lifetime, and [`Xhs::close`]
//! releases them on shutdown.

mod monitor;
mod settings;

pub use settings::{Settings, SettingsError};

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use chrono::Local;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::db::{Database, DbError};
use crate::download::{DownloadError, Downloader, RetryPolicy, sanitize_name};
pub use crate::extractor::ImageFormat;
use crate::extractor::{build_record, image_urls, parse_page, video_urls};
use crate::links::{LinkResolver, work_id_from_link};
use crate::net::{FetchError, Html, PageFetcher};
use crate::record::{Record, WorkKind};
use crate::store::{IdStore, RecordWriter, StoreError};

/// Orchestrator construction and persistence errors.
///
/// Per-link failures never surface here; they are logged and yield empty
/// records. This type covers the truly unrecoverable cases, primarily the
/// persistence collaborators failing to open.
#[derive(Debug, Error)]
pub enum XhsError {
    /// HTTP client construction failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The database could not be opened.
    #[error(transparent)]
    Db(#[from] DbError),

    /// A dedup-store query failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The download client could not be built.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The working directory could not be prepared.
    #[error("failed to prepare working directory: {0}")]
    Workdir(#[from] std::io::Error),
}

/// Builds the deterministic on-disk naming key for one work.
///
/// Publish-time colons become dots; the author name falls back to the author
/// ID when sanitization empties it, the title to the work ID likewise. The
/// title segment is truncated to 64 characters.
#[must_use]
pub fn naming_key(record: &Record) -> String {
    let time = record.publish_time.replace(':', ".");
    let author = match sanitize_name(&record.author_name) {
        s if s.is_empty() => record.author_id.clone(),
        s => s,
    };
    let title = match sanitize_name(&record.title) {
        s if s.is_empty() => record.work_id.clone(),
        s => s,
    };
    let title: String = title.chars().take(64).collect();
    format!("{time}_{author}_{title}")
}

/// Orchestrator over the whole pipeline.
pub struct Xhs {
    settings: Settings,
    fetcher: Arc<dyn PageFetcher>,
    resolver: LinkResolver,
    downloader: Downloader,
    ids: IdStore,
    records: RecordWriter,
    db: Database,
    stop: AtomicBool,
}

impl Xhs {
    /// Opens the orchestrator with the production HTTP fetcher.
    ///
    /// Prepares the working directory, opens the database, and builds the
    /// HTTP and download clients.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError`] when any collaborator fails to open.
    pub async fn open(settings: Settings) -> Result<Self, XhsError> {
        let fetcher = Arc::new(Html::new(
            settings.user_agent.as_deref(),
            settings.cookie.as_deref(),
            settings.proxy.as_deref(),
            settings.timeout_secs,
        )?);
        Self::open_with_fetcher(settings, fetcher).await
    }

    /// Opens the orchestrator over an explicit fetcher.
    ///
    /// This is the seam tests use to script page content; production code
    /// goes through [`Xhs::open`].
    ///
    /// # Errors
    ///
    /// Returns [`XhsError`] when any collaborator fails to open.
    pub async fn open_with_fetcher(
        settings: Settings,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self, XhsError> {
        std::fs::create_dir_all(settings.download_dir())?;
        let db = Database::new(&settings.db_path()).await?;

        let downloader = Downloader::new(
            settings.download_dir(),
            settings.user_agent.as_deref(),
            settings.proxy.as_deref(),
            settings.timeout_secs,
            RetryPolicy::with_max_attempts(settings.max_retry),
            settings.folder_mode,
        )?;

        Ok(Self {
            resolver: LinkResolver::new(Arc::clone(&fetcher)),
            fetcher,
            downloader,
            ids: IdStore::new(db.clone()),
            records: RecordWriter::new(db.clone()),
            db,
            settings,
            stop: AtomicBool::new(false),
        })
    }

    /// Resolves links from `text` and processes each in order.
    ///
    /// Sequential by design: records come back in resolved-link order, one
    /// per link, empty on per-link failure. Zero resolved links logs one
    /// warning and returns an empty vec.
    #[instrument(skip(self, text))]
    pub async fn extract(&self, text: &str, download: bool) -> Vec<Record> {
        let links = self.resolver.resolve_links(text).await;
        if links.is_empty() {
            warn!("no xiaohongshu work links recognized in input");
            return Vec::new();
        }
        info!(count = links.len(), "works pending processing");

        let mut records = Vec::with_capacity(links.len());
        for link in &links {
            records.push(self.process_one(link, download).await);
        }
        records
    }

    /// CLI variant: processes only the first resolved link, for side effects.
    #[instrument(skip(self, text))]
    pub async fn extract_cli(&self, text: &str, download: bool) {
        let links = self.resolver.resolve_links(text).await;
        match links.first() {
            Some(link) => {
                self.process_one(link, download).await;
            }
            None => warn!("no xiaohongshu work links recognized in input"),
        }
    }

    /// Tests whether a work already has a fully completed download.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Store`] when the dedup store cannot be queried.
    pub async fn skip_download(&self, work_id: &str) -> Result<bool, XhsError> {
        Ok(self.ids.contains(work_id).await?)
    }

    /// Processes one canonical link end to end: fetch, parse, classify,
    /// download gate, record. Always returns a record; an empty one marks
    /// total extraction failure for this link.
    pub(crate) async fn process_one(&self, link: &str, download: bool) -> Record {
        info!(link, work_id = work_id_from_link(link), "work processing started");

        let html = match self.fetcher.fetch_page(link).await {
            Ok(html) => html,
            Err(e) => {
                error!(link, error = %e, "page fetch failed");
                return Record::default();
            }
        };

        let Some(page) = parse_page(&html) else {
            error!(link, "page carries no usable state data");
            return Record::default();
        };

        let Some(mut record) = build_record(&page) else {
            error!(link, "record extraction failed");
            return Record::default();
        };

        record.download_urls = match record.kind {
            WorkKind::Video => video_urls(&page),
            WorkKind::ImageSet => image_urls(&page, self.settings.image_format),
            WorkKind::Other => Vec::new(),
        };

        self.download_gate(&mut record, download).await;
        info!(link, work_id = %record.work_id, "work processing finished");
        record
    }

    /// Decides whether to download, updates the dedup store, and always
    /// persists the record.
    async fn download_gate(&self, record: &mut Record, download: bool) {
        if record.download_urls.is_empty() {
            error!(work_id = %record.work_id, "failed to extract media download addresses");
        } else if !download {
            // Addresses stay recorded; nothing to fetch.
        } else {
            match self.ids.contains(&record.work_id).await {
                Ok(true) => {
                    info!(work_id = %record.work_id, "download record exists; skipping download");
                }
                Ok(false) => {
                    let key = naming_key(record);
                    let outcome = self
                        .downloader
                        .run(
                            &record.download_urls,
                            &key,
                            record.kind,
                            self.settings.image_format,
                        )
                        .await;
                    if outcome.all_succeeded() {
                        if let Err(e) = self.ids.add(&record.work_id).await {
                            error!(work_id = %record.work_id, error = %e, "failed to record completed download");
                        }
                    }
                }
                Err(e) => {
                    // Without a dedup answer a download could duplicate
                    // completed work; record the work and move on.
                    error!(work_id = %record.work_id, error = %e, "dedup lookup failed; download skipped");
                }
            }
        }

        self.save_data(record).await;
    }

    /// Stamps the collection time and hands the record to the writer.
    ///
    /// Write failures are the writer's concern; the pipeline logs and
    /// continues so no batch dies on a persistence hiccup.
    async fn save_data(&self, record: &mut Record) {
        record.collected_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        if let Err(e) = self.records.append(record).await {
            error!(work_id = %record.work_id, error = %e, "record write failed");
        }
    }

    /// Settings this orchestrator was opened with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Record writer handle, for summaries and tests.
    #[must_use]
    pub fn records(&self) -> &RecordWriter {
        &self.records
    }

    /// Releases the persistence collaborators.
    ///
    /// Dropping an `Xhs` also releases them; `close` makes the release
    /// explicit on orderly shutdown paths.
    pub async fn close(self) {
        self.db.close().await;
    }
}
