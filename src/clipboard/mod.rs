//! cliptrail - Clipboard module
//!
//! Clipboard access, content classification, and the polling watcher

pub mod access;
pub mod classifier;
pub mod html;
pub mod models;
pub mod monitor;
pub mod patterns;

pub use access::{ClipboardAccess, ClipboardError, ClipboardImage, ClipboardSnapshot, SystemClipboard};
pub use classifier::{classify, Classification};
pub use models::{ContentType, Entry, EntryError, EntryRecord};
pub use monitor::{ClipboardPoller, ClipboardWatcher, PollOutcome};
