//! cliptrail - History module
//!
//! Ordered capture history, its persistence and change notifications

pub mod export;
pub mod notify;
pub mod store;

pub use notify::{HistoryChanged, HistoryListener, NotificationHub};
pub use store::{HistoryError, HistoryStore, HISTORY_KEY};
