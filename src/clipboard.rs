//! Clipboard reader seam for monitor mode.
//!
//! The monitor polls the OS clipboard as a stream of candidate link text.
//! Access goes through [`ClipboardReader`] so tests can feed a scripted
//! sequence; [`SystemClipboard`] is the production implementation.

use thiserror::Error;

/// Clipboard access errors.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The platform clipboard could not be opened.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    /// A read failed after the clipboard was opened.
    #[error("clipboard read failed: {0}")]
    Read(String),
}

/// Source of clipboard text for the monitor's producer task.
pub trait ClipboardReader: Send {
    /// Returns the current clipboard text.
    ///
    /// A clipboard holding no text (or non-text content) reads as an empty
    /// string rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`ClipboardError::Read`] on platform-level failures.
    fn read_text(&mut self) -> Result<String, ClipboardError>;
}

/// OS clipboard access via `arboard`.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Opens the platform clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`ClipboardError::Unavailable`] when no clipboard is
    /// reachable (e.g. headless session without a display server).
    pub fn new() -> Result<Self, ClipboardError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl ClipboardReader for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        match self.inner.get_text() {
            Ok(text) => Ok(text),
            // Non-text or empty clipboard is a normal condition while polling.
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(ClipboardError::Read(e.to_string())),
        }
    }
}
