//! Clipboard monitor: a producer/consumer pair over one link queue.
//!
//! The producer polls the clipboard and enqueues every link it recognizes in
//! new clipboard text; the consumer drains the queue through the single-work
//! pipeline. Both tasks re-check a shared stop flag each cycle; shutdown is
//! cooperative and the queue is always fully drained before `monitor`
//! returns.

use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{info, warn};

use super::Xhs;
use crate::clipboard::ClipboardReader;

/// Clipboard text that shuts the monitor down, compared case-insensitively.
const CLOSE_SENTINEL: &str = "close";

impl Xhs {
    /// Watches the clipboard and processes every recognized link until
    /// stopped.
    ///
    /// Blocks until [`Xhs::stop_monitor`] is called or the sentinel text
    /// `"close"` (any letter case) appears on the clipboard, then drains any
    /// links still queued before returning.
    pub async fn monitor<C: ClipboardReader>(
        &self,
        clipboard: &mut C,
        delay: Duration,
        download: bool,
    ) {
        info!(
            delay_ms = delay.as_millis(),
            download,
            "monitoring clipboard for xiaohongshu links; write \"close\" to the clipboard to stop"
        );
        self.stop.store(false, Ordering::SeqCst);

        let (tx, rx) = unbounded_channel();
        tokio::join!(
            self.push_links(clipboard, tx, delay),
            self.receive_links(rx, delay, download),
        );
    }

    /// Requests monitor shutdown. Idempotent; queued links still drain.
    pub fn stop_monitor(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Producer: polls the clipboard and feeds the queue.
    ///
    /// The cache of the last seen clipboard text lives here, so two
    /// identical consecutive reads enqueue nothing.
    async fn push_links<C: ClipboardReader>(
        &self,
        clipboard: &mut C,
        tx: UnboundedSender<String>,
        delay: Duration,
    ) {
        let mut cache = String::new();
        while !self.stop.load(Ordering::SeqCst) {
            let text = match clipboard.read_text() {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "clipboard read failed");
                    String::new()
                }
            };

            if text.to_lowercase() == CLOSE_SENTINEL {
                self.stop_monitor();
            } else if text != cache {
                cache = text;
                for link in self.resolver.resolve_links(&cache).await {
                    if tx.send(link).is_err() {
                        return;
                    }
                }
            }
            tokio::time::sleep(delay).await;
        }
        // Dropping `tx` here lets the consumer observe disconnection once
        // the queue is drained.
    }

    /// Consumer: drains the queue through the single-work pipeline.
    ///
    /// Runs while the stop flag is clear or links remain queued; an empty
    /// queue is a normal, silent condition.
    async fn receive_links(
        &self,
        mut rx: UnboundedReceiver<String>,
        delay: Duration,
        download: bool,
    ) {
        loop {
            match rx.try_recv() {
                Ok(link) => {
                    self.process_one(&link, download).await;
                }
                Err(TryRecvError::Empty) => {
                    if self.stop.load(Ordering::SeqCst) {
                        break;
                    }
                }
                Err(TryRecvError::Disconnected) => break,
            }
            tokio::time::sleep(delay).await;
        }
    }
}
