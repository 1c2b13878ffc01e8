//! cliptrail - History change notifications

use crate::clipboard::Entry;

/// Payload handed to the listener after each history change
#[derive(Debug, Clone, Copy)]
pub struct HistoryChanged<'a> {
    /// Full history, newest first
    pub entries: &'a [Entry],
    /// Captures since the consumer last marked history as seen
    pub update_count: u32,
}

/// Callback type accepted by [`NotificationHub`]
pub type HistoryListener = Box<dyn Fn(HistoryChanged<'_>) + Send + Sync>;

/// Holds the single history listener
///
/// The listener runs while the history is locked, so it must not call back into
/// the engine; everything it needs is in [`HistoryChanged`].
#[derive(Default)]
pub struct NotificationHub {
    listener: Option<HistoryListener>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the listener, replacing any previous one
    pub fn set_listener(&mut self, listener: HistoryListener) {
        self.listener = Some(listener);
    }

    pub fn notify(&self, entries: &[Entry], update_count: u32) {
        if let Some(listener) = &self.listener {
            listener(HistoryChanged {
                entries,
                update_count,
            });
        }
    }
}
