//! cliptrail - History store
//!
//! Newest-first list of captures. Every mutation writes the whole list back to
//! storage (fire-and-forget) and then notifies the listener.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::export;
use super::notify::{HistoryListener, NotificationHub};
use crate::clipboard::{ClipboardAccess, Entry, EntryRecord};
use crate::storage::{KeyValueStore, SnapshotWriter};

/// Storage key of the persisted history
pub const HISTORY_KEY: &str = "data";

/// History error type
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("No entry captured at {0}")]
    NotFound(DateTime<Utc>),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct HistoryStore {
    entries: Vec<Entry>,
    update_count: u32,
    storage: Arc<dyn KeyValueStore>,
    writer: SnapshotWriter,
    clipboard: Arc<dyn ClipboardAccess>,
    hub: NotificationHub,
}

impl HistoryStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, clipboard: Arc<dyn ClipboardAccess>) -> Self {
        Self {
            entries: Vec::new(),
            update_count: 0,
            writer: SnapshotWriter::new(Arc::clone(&storage)),
            storage,
            clipboard,
            hub: NotificationHub::new(),
        }
    }

    pub fn set_listener(&mut self, listener: HistoryListener) {
        self.hub.set_listener(listener);
    }

    /// Current history, newest first
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Most recent capture
    pub fn head(&self) -> Option<&Entry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn update_count(&self) -> u32 {
        self.update_count
    }

    /// Count one more unseen capture
    pub fn bump_update_count(&mut self) {
        self.update_count = self.update_count.saturating_add(1);
    }

    /// Reset the unseen-capture counter (the consumer has looked at the history)
    pub fn mark_seen(&mut self) {
        self.update_count = 0;
    }

    /// Load the history persisted by a previous run
    ///
    /// Unreadable storage counts as no prior history. Records that fail to
    /// decode are skipped.
    pub fn read_persisted(&self) -> Vec<Entry> {
        let raw = match self.storage.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("[History] Failed to read stored history: {}", e);
                return Vec::new();
            }
        };

        let records: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("[History] Stored history is not a JSON array: {}", e);
                return Vec::new();
            }
        };

        records
            .into_iter()
            .filter_map(|value| {
                let record: EntryRecord = match serde_json::from_value(value) {
                    Ok(record) => record,
                    Err(e) => {
                        log::warn!("[History] Skipping malformed record: {}", e);
                        return None;
                    }
                };
                match Entry::from_record(record) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        log::warn!("[History] Skipping record: {}", e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Append a loaded batch behind the in-memory entries
    ///
    /// Captures made before the load finished sit at the head already. If the
    /// oldest of them is the same text as the newest loaded entry, that loaded
    /// entry is the same capture persisted by the previous run and is dropped.
    pub fn load_and_merge(&mut self, mut loaded: Vec<Entry>) {
        let overlaps = match (self.entries.last(), loaded.first()) {
            (Some(oldest), Some(newest_loaded)) => oldest.text() == newest_loaded.text(),
            _ => false,
        };
        if overlaps {
            loaded.remove(0);
        }

        log::info!(
            "[History] Merged {} stored entries behind {} live ones",
            loaded.len(),
            self.entries.len()
        );
        self.entries.extend(loaded);
        self.notify();
    }

    /// Record a new capture at the head
    pub fn prepend(&mut self, entry: Entry) {
        log::info!(
            "[History] New {} entry: \"{}\"",
            entry.content_type(),
            entry.preview(20)
        );
        self.entries.insert(0, entry);
        self.commit();
    }

    /// Remove every entry captured at `captured_at`; returns how many went
    ///
    /// Removing the head also clears the OS clipboard so the stale copy is not
    /// re-captured.
    pub fn remove(&mut self, captured_at: &DateTime<Utc>) -> usize {
        if self.head().map(|e| e.captured_at()) == Some(*captured_at) {
            self.clear_clipboard();
        }

        let before = self.entries.len();
        self.entries.retain(|e| e.captured_at() != *captured_at);
        let removed = before - self.entries.len();
        log::debug!("[History] Removed {} entries captured at {}", removed, captured_at);

        self.commit();
        removed
    }

    /// Drop the whole history, reset the counter and clear the OS clipboard
    pub fn clear(&mut self) {
        self.clear_clipboard();
        self.entries.clear();
        self.update_count = 0;
        log::info!("[History] Cleared");
        self.commit();
    }

    pub fn pin(&mut self, captured_at: &DateTime<Utc>) -> Result<(), HistoryError> {
        self.set_pinned(captured_at, true)
    }

    pub fn unpin(&mut self, captured_at: &DateTime<Utc>) -> Result<(), HistoryError> {
        self.set_pinned(captured_at, false)
    }

    fn set_pinned(&mut self, captured_at: &DateTime<Utc>, pinned: bool) -> Result<(), HistoryError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.captured_at() == *captured_at)
            .ok_or(HistoryError::NotFound(*captured_at))?;

        if pinned {
            entry.pin();
        } else {
            entry.unpin();
        }
        self.commit();
        Ok(())
    }

    /// Entries whose text contains `query`, or whose type name does
    pub fn search(&self, query: &str) -> Vec<Entry> {
        self.entries
            .iter()
            .filter(|e| e.text().contains(query) || e.content_type().as_str().contains(query))
            .cloned()
            .collect()
    }

    /// Export as CSV; `.csv` is appended when missing. Returns the written path.
    pub fn export_csv(&self, destination: &Path) -> Result<PathBuf, HistoryError> {
        let path = export::write_csv(&self.entries, destination)?;
        log::info!("[History] Exported {} entries to {:?}", self.entries.len(), path);
        Ok(path)
    }

    /// Wait for queued storage writes to land
    pub fn flush(&self) {
        self.writer.flush();
    }

    fn commit(&self) {
        self.persist();
        self.notify();
    }

    fn persist(&self) {
        let records: Vec<EntryRecord> = self.entries.iter().map(Entry::to_record).collect();
        match serde_json::to_string(&records) {
            Ok(json) => self.writer.submit(HISTORY_KEY, json),
            Err(e) => log::error!("[History] Failed to serialize history: {}", e),
        }
    }

    fn notify(&self) {
        self.hub.notify(&self.entries, self.update_count);
    }

    fn clear_clipboard(&self) {
        if let Err(e) = self.clipboard.clear() {
            log::warn!("[History] Failed to clear clipboard: {}", e);
        }
    }
}
