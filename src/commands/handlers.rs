//! cliptrail - Command handlers
//!
//! Serializable request/response surface over the engine. Entries are
//! addressed by their capture time in RFC3339 form.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clipboard::EntryRecord;
use crate::ClipboardEngine;

/// Command execution result
#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

fn parse_time(time: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(time)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("Invalid time {:?}: {}", time, e))
}

/// Get clipboard history list, newest first
pub fn get_clipboard_history(engine: &ClipboardEngine) -> CommandResult<Vec<EntryRecord>> {
    let records = engine.history().iter().map(|e| e.to_record()).collect();
    CommandResult::ok(records)
}

/// Search history by text or type name
pub fn search_clipboard(engine: &ClipboardEngine, query: &str) -> CommandResult<Vec<EntryRecord>> {
    let records = engine.search(query).iter().map(|e| e.to_record()).collect();
    CommandResult::ok(records)
}

/// Delete the entries captured at `time`
pub fn delete_item(engine: &ClipboardEngine, time: &str) -> CommandResult<usize> {
    match parse_time(time) {
        Ok(at) => CommandResult::ok(engine.remove(&at)),
        Err(e) => CommandResult::err(e),
    }
}

/// Pin or unpin an entry
pub fn pin_item(engine: &ClipboardEngine, time: &str, pinned: bool) -> CommandResult<bool> {
    let at = match parse_time(time) {
        Ok(at) => at,
        Err(e) => return CommandResult::err(e),
    };

    let result = if pinned { engine.pin(&at) } else { engine.unpin(&at) };
    match result {
        Ok(()) => CommandResult::ok(pinned),
        Err(e) => CommandResult::err(format!("Failed to update pin: {}", e)),
    }
}

/// Paste specified record (copy to system clipboard)
pub fn paste_item(engine: &ClipboardEngine, time: &str) -> CommandResult<bool> {
    let at = match parse_time(time) {
        Ok(at) => at,
        Err(e) => return CommandResult::err(e),
    };

    match engine.copy_to_clipboard(&at) {
        Ok(()) => CommandResult::ok(true),
        Err(e) => CommandResult::err(format!("Failed to paste item: {}", e)),
    }
}

/// Clear all history
pub fn clear_all_history(engine: &ClipboardEngine) -> CommandResult<bool> {
    engine.clear();
    CommandResult::ok(true)
}

/// Export history as CSV; returns the written path
pub fn export_history(engine: &ClipboardEngine, path: &str) -> CommandResult<String> {
    match engine.export_csv(Path::new(path)) {
        Ok(written) => CommandResult::ok(written.to_string_lossy().into_owned()),
        Err(e) => CommandResult::err(format!("Failed to export history: {}", e)),
    }
}

/// Number of captures since the history was last viewed
pub fn get_update_count(engine: &ClipboardEngine) -> CommandResult<u32> {
    CommandResult::ok(engine.update_count())
}

pub fn mark_seen(engine: &ClipboardEngine) -> CommandResult<bool> {
    engine.mark_seen();
    CommandResult::ok(true)
}
