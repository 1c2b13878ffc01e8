//! cliptrail - Background snapshot writer
//!
//! Mutations hand a full snapshot to the writer and return immediately. One
//! worker thread applies writes in submission order; failures are logged and
//! dropped. The in-memory history stays authoritative either way.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::KeyValueStore;

enum WriteRequest {
    Put { key: String, value: String },
    Flush(mpsc::SyncSender<()>),
}

/// Ordered fire-and-forget writer in front of a [`KeyValueStore`]
pub struct SnapshotWriter {
    tx: Option<Sender<WriteRequest>>,
    worker: Option<JoinHandle<()>>,
}

impl SnapshotWriter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("cliptrail-writer".to_string())
            .spawn(move || Self::run(store, rx));

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("[Storage] Failed to start writer thread: {}", e);
                None
            }
        };

        Self {
            tx: Some(tx),
            worker,
        }
    }

    fn run(store: Arc<dyn KeyValueStore>, rx: Receiver<WriteRequest>) {
        // Ends once every sender is gone and the queue is drained
        for request in rx {
            match request {
                WriteRequest::Put { key, value } => {
                    if let Err(e) = store.set(&key, &value) {
                        log::error!("[Storage] Failed to write '{}': {}", key, e);
                    } else {
                        log::debug!("[Storage] Wrote '{}' ({} bytes)", key, value.len());
                    }
                }
                WriteRequest::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
    }

    /// Queue `value` to be written under `key`
    pub fn submit(&self, key: &str, value: String) {
        let Some(tx) = &self.tx else {
            return;
        };
        let request = WriteRequest::Put {
            key: key.to_string(),
            value,
        };
        if tx.send(request).is_err() {
            log::error!("[Storage] Writer thread is gone, dropping write of '{}'", key);
        }
    }

    /// Block until every write queued so far has been applied
    pub fn flush(&self) {
        let Some(tx) = &self.tx else {
            return;
        };
        let (ack_tx, ack_rx) = mpsc::sync_channel(1);
        if tx.send(WriteRequest::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain what is queued and exit
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("[Storage] Writer thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")))
        }
    }

    #[test]
    fn test_writes_apply_in_order() {
        let store = Arc::new(MemoryStore::new());
        let writer = SnapshotWriter::new(store.clone());
        for i in 0..50 {
            writer.submit("data", i.to_string());
        }
        writer.flush();
        assert_eq!(store.get("data").unwrap().as_deref(), Some("49"));
    }

    #[test]
    fn test_drop_drains_queue() {
        let store = Arc::new(MemoryStore::new());
        {
            let writer = SnapshotWriter::new(store.clone());
            writer.submit("data", "last".to_string());
        }
        assert_eq!(store.get("data").unwrap().as_deref(), Some("last"));
    }

    #[test]
    fn test_failed_write_does_not_stop_worker() {
        let writer = SnapshotWriter::new(Arc::new(BrokenStore));
        writer.submit("data", "x".to_string());
        writer.submit("data", "y".to_string());
        writer.flush();
    }
}
