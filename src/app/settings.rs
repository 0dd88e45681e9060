//! Runtime configuration: defaults, file loading, derived paths.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::download::DEFAULT_MAX_RETRY;
use crate::extractor::ImageFormat;

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default clipboard polling delay in milliseconds.
const DEFAULT_MONITOR_DELAY_MS: u64 = 1000;

/// Settings file errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid JSON for this schema.
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime configuration for the whole pipeline.
///
/// Unknown fields in the settings file are ignored; missing fields take
/// their defaults, so a partial file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root working directory; database and downloads live beneath it
    pub work_path: PathBuf,
    /// Name of the download folder under `work_path`
    pub folder_name: String,
    /// Override for the request user agent
    pub user_agent: Option<String>,
    /// Raw cookie string attached to page fetches
    pub cookie: Option<String>,
    /// Proxy URL applied to all requests
    pub proxy: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Attempt budget per downloaded file
    pub max_retry: u32,
    /// Output encoding requested for image works
    pub image_format: ImageFormat,
    /// Give every work its own subfolder
    pub folder_mode: bool,
    /// Clipboard polling delay for monitor mode, in milliseconds
    pub monitor_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_path: PathBuf::from("."),
            folder_name: "Download".to_string(),
            user_agent: None,
            cookie: None,
            proxy: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retry: DEFAULT_MAX_RETRY,
            image_format: ImageFormat::default(),
            folder_mode: false,
            monitor_delay_ms: DEFAULT_MONITOR_DELAY_MS,
        }
    }
}

impl Settings {
    /// Loads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Loads settings from `settings.json` under `work_path`, falling back
    /// to defaults when the file is absent or unreadable.
    #[must_use]
    pub fn load_or_default(work_path: &Path) -> Self {
        let file = work_path.join("settings.json");
        if !file.exists() {
            return Self {
                work_path: work_path.to_path_buf(),
                ..Self::default()
            };
        }
        match Self::load(&file) {
            Ok(mut settings) => {
                settings.work_path = work_path.to_path_buf();
                settings
            }
            Err(e) => {
                warn!(file = %file.display(), error = %e, "settings file ignored; using defaults");
                Self {
                    work_path: work_path.to_path_buf(),
                    ..Self::default()
                }
            }
        }
    }

    /// Directory downloaded media is written to.
    #[must_use]
    pub fn download_dir(&self) -> PathBuf {
        self.work_path.join(&self.folder_name)
    }

    /// Path of the SQLite database holding records and the dedup set.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.work_path.join("xhs_downloader.db")
    }
}
