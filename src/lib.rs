//! cliptrail - Clipboard history engine
//!
//! Watches the system clipboard, keeps a persistent de-duplicated history,
//! classifies every capture and extracts `#labels` from it.

pub mod clipboard;
pub mod commands;
pub mod config;
pub mod history;
pub mod storage;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use clipboard::{
    ClipboardAccess, ClipboardError, ClipboardPoller, ClipboardWatcher, Entry, PollOutcome,
    SystemClipboard,
};
use config::Settings;
use history::{HistoryChanged, HistoryError, HistoryStore};
use storage::{KeyValueStore, SqliteStore};

/// Engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// Owns the history and the watcher that feeds it
///
/// Built once by the process entry point and handed to collaborators by
/// reference.
pub struct ClipboardEngine {
    store: Arc<Mutex<HistoryStore>>,
    clipboard: Arc<dyn ClipboardAccess>,
    watcher: ClipboardWatcher,
    settings: Settings,
}

impl ClipboardEngine {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        clipboard: Arc<dyn ClipboardAccess>,
        settings: Settings,
    ) -> Self {
        let store = Arc::new(Mutex::new(HistoryStore::new(storage, Arc::clone(&clipboard))));
        let poller = ClipboardPoller::new(
            Arc::clone(&store),
            Arc::clone(&clipboard),
            settings.image_dir.clone(),
        );

        Self {
            store,
            clipboard,
            watcher: ClipboardWatcher::new(poller),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Install the history change callback
    ///
    /// It runs with the history locked and must not call back into the engine.
    pub fn set_listener<F>(&self, listener: F)
    where
        F: Fn(HistoryChanged<'_>) + Send + Sync + 'static,
    {
        self.store.lock().set_listener(Box::new(listener));
    }

    /// Merge the persisted history behind whatever is already captured
    ///
    /// Returns the number of entries read from storage.
    pub fn load(&self) -> usize {
        let mut store = self.store.lock();
        let loaded = store.read_persisted();
        let count = loaded.len();
        store.load_and_merge(loaded);
        count
    }

    /// Start polling at the configured interval
    pub fn begin_watch(&mut self) -> bool {
        let interval = self.settings.poll_interval();
        self.begin_watch_every(interval)
    }

    pub fn begin_watch_every(&mut self, interval: Duration) -> bool {
        self.watcher.begin_watch(interval)
    }

    pub fn stop_watch(&mut self) {
        self.watcher.stop_watch();
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_polling()
    }

    /// Run one poll step outside the watch loop
    pub fn poll_once(&self) -> PollOutcome {
        self.watcher.poller().poll_once()
    }

    /// Snapshot of the history, newest first
    pub fn history(&self) -> Vec<Entry> {
        self.store.lock().entries().to_vec()
    }

    /// Entries whose text or type name contains `query`; everything for an empty query
    pub fn search(&self, query: &str) -> Vec<Entry> {
        self.store.lock().search(query)
    }

    pub fn update_count(&self) -> u32 {
        self.store.lock().update_count()
    }

    pub fn mark_seen(&self) {
        self.store.lock().mark_seen();
    }

    pub fn remove(&self, captured_at: &DateTime<Utc>) -> usize {
        self.store.lock().remove(captured_at)
    }

    pub fn pin(&self, captured_at: &DateTime<Utc>) -> Result<(), HistoryError> {
        self.store.lock().pin(captured_at)
    }

    pub fn unpin(&self, captured_at: &DateTime<Utc>) -> Result<(), HistoryError> {
        self.store.lock().unpin(captured_at)
    }

    pub fn clear(&self) {
        self.store.lock().clear();
    }

    pub fn export_csv(&self, destination: &Path) -> Result<PathBuf, HistoryError> {
        self.store.lock().export_csv(destination)
    }

    /// Put an entry's text back on the system clipboard
    ///
    /// HTML rich content goes along with it; an image file reference does not.
    pub fn copy_to_clipboard(&self, captured_at: &DateTime<Utc>) -> Result<(), EngineError> {
        let (text, html) = {
            let store = self.store.lock();
            let entry = store
                .entries()
                .iter()
                .find(|e| e.captured_at() == *captured_at)
                .ok_or(HistoryError::NotFound(*captured_at))?;
            let html = entry
                .rich_content()
                .filter(|rich| rich.trim_start().starts_with('<'))
                .map(str::to_string);
            (entry.text().to_string(), html)
        };

        self.clipboard.write_current(&text, html.as_deref())?;
        Ok(())
    }

    /// Wait for pending history writes
    pub fn flush(&self) {
        self.store.lock().flush();
    }
}

/// Headless entry point: watch the system clipboard until Ctrl-C
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    log::info!("cliptrail starting...");

    let data_dir = config::default_data_dir();
    log::info!("Data directory: {:?}", data_dir);

    let storage: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&data_dir)?);
    let settings = Settings::load(storage.as_ref());
    log::info!("Images are saved to {:?}", settings.image_dir);

    let mut engine = ClipboardEngine::new(storage, Arc::new(SystemClipboard::new()), settings);
    engine.set_listener(|change| {
        log::info!(
            "History changed: {} entries, {} unseen",
            change.entries.len(),
            change.update_count
        );
    });

    let loaded = engine.load();
    log::info!("Loaded {} entries from storage", loaded);

    if !engine.begin_watch() {
        return Err("clipboard watcher failed to start".into());
    }
    log::info!("cliptrail initialized successfully");

    tokio::signal::ctrl_c().await?;

    log::info!("Shutting down");
    engine.stop_watch();
    engine.flush();
    Ok(())
}
