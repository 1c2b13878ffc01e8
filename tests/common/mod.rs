#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use cliptrail_lib::clipboard::{ClipboardAccess, ClipboardError, ClipboardImage, ClipboardSnapshot};
use cliptrail_lib::config::Settings;
use cliptrail_lib::storage::{KeyValueStore, MemoryStore, StorageError};
use cliptrail_lib::ClipboardEngine;

/// In-memory clipboard that counts clears and can be told to fail reads
#[derive(Default)]
pub struct FakeClipboard {
    current: Mutex<ClipboardSnapshot>,
    clears: AtomicUsize,
    fail_reads: AtomicBool,
}

impl FakeClipboard {
    pub fn put_text(&self, text: &str) {
        *self.current.lock() = ClipboardSnapshot::text(text);
    }

    pub fn put_image(&self, image: ClipboardImage) {
        *self.current.lock() = ClipboardSnapshot {
            image: Some(image),
            ..ClipboardSnapshot::default()
        };
    }

    pub fn current(&self) -> ClipboardSnapshot {
        self.current.lock().clone()
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl ClipboardAccess for FakeClipboard {
    fn read_current(&self) -> Result<ClipboardSnapshot, ClipboardError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClipboardError::Unavailable("locked by another process".into()));
        }
        Ok(self.current.lock().clone())
    }

    fn write_current(&self, text: &str, html: Option<&str>) -> Result<(), ClipboardError> {
        *self.current.lock() = ClipboardSnapshot {
            text: Some(text.to_string()),
            html: html.map(str::to_string),
            image: None,
        };
        Ok(())
    }

    fn clear(&self) -> Result<(), ClipboardError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        *self.current.lock() = ClipboardSnapshot::default();
        Ok(())
    }
}

/// Storage whose reads and writes always fail
pub struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(io::Error::new(io::ErrorKind::Other, "disk gone").into())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(io::Error::new(io::ErrorKind::Other, "disk gone").into())
    }
}

pub fn engine_on(storage: Arc<dyn KeyValueStore>) -> (ClipboardEngine, Arc<FakeClipboard>) {
    let clipboard = Arc::new(FakeClipboard::default());
    let engine = ClipboardEngine::new(storage, clipboard.clone(), Settings::default());
    (engine, clipboard)
}

pub fn engine() -> (ClipboardEngine, Arc<FakeClipboard>) {
    engine_on(Arc::new(MemoryStore::new()))
}

/// Put each text on the clipboard and poll it in
pub fn capture(engine: &ClipboardEngine, clipboard: &FakeClipboard, texts: &[&str]) {
    for text in texts {
        clipboard.put_text(text);
        engine.poll_once();
    }
}

pub fn texts(engine: &ClipboardEngine) -> Vec<String> {
    engine.history().iter().map(|e| e.text().to_string()).collect()
}
