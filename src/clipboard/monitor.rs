//! cliptrail - Clipboard watching
//!
//! Polls the clipboard on a fixed interval and records a new entry whenever the
//! content differs from the head of the history

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::access::{ClipboardAccess, ClipboardImage, ClipboardSnapshot};
use super::html;
use super::models::Entry;
use crate::history::HistoryStore;

/// Default polling interval
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Intervals below this are raised to it
pub const MIN_POLL_INTERVAL_MS: u64 = 10;

/// What a single poll did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A new entry was recorded
    Recorded,
    /// Same text as the head entry
    Unchanged,
    /// Nothing usable on the clipboard
    Empty,
    /// The clipboard could not be read
    ReadFailed,
}

/// Image bytes that still have to be saved for a recorded capture
struct PendingImage {
    image: ClipboardImage,
    path: PathBuf,
}

/// Entry-ready view of one clipboard snapshot
struct Capture {
    text: String,
    rich_content: Option<String>,
    image: Option<PendingImage>,
}

impl Capture {
    fn from_snapshot(snapshot: ClipboardSnapshot, image_dir: &Path) -> Option<Self> {
        if let Some(text) = snapshot.text.filter(|t| !t.is_empty()) {
            return Some(Self {
                text,
                rich_content: snapshot.html,
                image: None,
            });
        }

        if let Some(image) = snapshot.image {
            // Prefer the file name of an image the HTML flavor already points at
            if let Some(name) = snapshot.html.as_deref().and_then(html::image_file_name) {
                return Some(Self {
                    text: name,
                    rich_content: snapshot.html,
                    image: None,
                });
            }

            // Named by content so the same image on the next tick dedups
            let hash = image.content_hash();
            let name = format!("{}.png", &hash[..16]);
            let path = image_dir.join(&name);
            return Some(Self {
                text: name,
                rich_content: Some(path.to_string_lossy().into_owned()),
                image: Some(PendingImage { image, path }),
            });
        }

        let html = snapshot.html?;
        let text = html::html_to_text(&html);
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text,
            rich_content: Some(html),
            image: None,
        })
    }
}

/// Stamp for a new capture: never at or before the current head
pub fn next_capture_time(now: DateTime<Utc>, head: Option<DateTime<Utc>>) -> DateTime<Utc> {
    match head {
        Some(previous) if now <= previous => previous + chrono::Duration::milliseconds(1),
        _ => now,
    }
}

/// One poll step, shared by the watch loop and direct callers
#[derive(Clone)]
pub struct ClipboardPoller {
    store: Arc<Mutex<HistoryStore>>,
    clipboard: Arc<dyn ClipboardAccess>,
    image_dir: PathBuf,
    consecutive_errors: Arc<AtomicU32>,
}

impl ClipboardPoller {
    pub fn new(
        store: Arc<Mutex<HistoryStore>>,
        clipboard: Arc<dyn ClipboardAccess>,
        image_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            clipboard,
            image_dir,
            consecutive_errors: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Read the clipboard once and record it if it changed
    pub fn poll_once(&self) -> PollOutcome {
        let snapshot = match self.clipboard.read_current() {
            Ok(snapshot) => {
                self.consecutive_errors.store(0, Ordering::SeqCst);
                snapshot
            }
            Err(e) => {
                let failures = self.consecutive_errors.fetch_add(1, Ordering::SeqCst) + 1;
                // Only log errors occasionally to avoid spam
                if failures == 1 || failures % 10 == 0 {
                    log::warn!("[Watcher] Clipboard read failed ({} in a row): {}", failures, e);
                }
                return PollOutcome::ReadFailed;
            }
        };

        let Some(capture) = Capture::from_snapshot(snapshot, &self.image_dir) else {
            return PollOutcome::Empty;
        };

        let pending_image = {
            let mut store = self.store.lock();
            if store.head().map(|e| e.text()) == Some(capture.text.as_str()) {
                return PollOutcome::Unchanged;
            }

            let captured_at = next_capture_time(Utc::now(), store.head().map(|e| e.captured_at()));
            store.bump_update_count();
            store.prepend(Entry::new(capture.text, capture.rich_content, captured_at));
            capture.image
        };

        if let Some(pending) = pending_image {
            save_image(pending);
        }
        PollOutcome::Recorded
    }
}

/// Encode and write captured image bytes on a background thread; failures are ignored
fn save_image(pending: PendingImage) {
    thread::spawn(move || {
        let result = pending.image.to_png().map_err(|e| e.to_string()).and_then(|png| {
            if let Some(dir) = pending.path.parent() {
                fs::create_dir_all(dir).map_err(|e| e.to_string())?;
            }
            fs::write(&pending.path, png).map_err(|e| e.to_string())
        });
        match result {
            Ok(()) => log::debug!("[Watcher] Saved image to {:?}", pending.path),
            Err(e) => log::debug!("[Watcher] Could not save image to {:?}: {}", pending.path, e),
        }
    });
}

/// Clipboard watcher
///
/// Idle until [`begin_watch`](Self::begin_watch), then polling on a tokio task
/// until [`stop_watch`](Self::stop_watch).
pub struct ClipboardWatcher {
    poller: ClipboardPoller,
    cancel_token: Option<CancellationToken>,
    handle: Option<JoinHandle<()>>,
}

impl ClipboardWatcher {
    pub fn new(poller: ClipboardPoller) -> Self {
        Self {
            poller,
            cancel_token: None,
            handle: None,
        }
    }

    pub fn poller(&self) -> &ClipboardPoller {
        &self.poller
    }

    pub fn is_polling(&self) -> bool {
        self.cancel_token.is_some()
    }

    /// Start polling every `interval`; must run inside a tokio runtime
    ///
    /// Returns false if already polling or no runtime is available.
    pub fn begin_watch(&mut self, interval: Duration) -> bool {
        if self.is_polling() {
            log::warn!("[Watcher] Already watching");
            return false;
        }
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                log::error!("[Watcher] No async runtime to poll on: {}", e);
                return false;
            }
        };

        let interval = interval.max(Duration::from_millis(MIN_POLL_INTERVAL_MS));
        let cancel_token = CancellationToken::new();
        let handle = runtime.spawn(watch_loop(self.poller.clone(), interval, cancel_token.clone()));

        log::info!("[Watcher] Started with {}ms interval", interval.as_millis());
        self.cancel_token = Some(cancel_token);
        self.handle = Some(handle);
        true
    }

    /// Stop polling; no-op when idle
    pub fn stop_watch(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
            log::info!("[Watcher] Stopped");
        }
        // The loop exits at its next wake-up; nothing to wait for
        self.handle.take();
    }
}

impl Drop for ClipboardWatcher {
    fn drop(&mut self) {
        self.stop_watch();
    }
}

async fn watch_loop(poller: ClipboardPoller, interval: Duration, cancel_token: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            _ = ticker.tick() => {
                poller.poll_once();
            }
        }
    }
    log::debug!("[Watcher] Poll loop exited");
}
