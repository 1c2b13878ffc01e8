//! cliptrail - Storage module
//!
//! Key/value persistence capability and its adapters

pub mod database;
pub mod memory;
pub mod writer;

pub use database::SqliteStore;
pub use memory::MemoryStore;
pub use writer::SnapshotWriter;

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key/value storage capability
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
