//! cliptrail - Engine settings
//!
//! Settings live in the same key/value storage as the history, one key per field

use std::path::PathBuf;
use std::time::Duration;

use crate::clipboard::monitor::DEFAULT_POLL_INTERVAL_MS;
use crate::storage::{KeyValueStore, StorageError};

const POLL_INTERVAL_KEY: &str = "poll_interval_ms";
const IMAGE_DIR_KEY: &str = "image_dir";

/// Engine settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Clipboard polling interval
    pub poll_interval_ms: u64,
    /// Where captured images are written
    pub image_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            image_dir: default_image_dir(),
        }
    }
}

/// `<temp>/cliptrail/images`
pub fn default_image_dir() -> PathBuf {
    std::env::temp_dir().join("cliptrail").join("images")
}

/// `<platform data dir>/cliptrail`, or the working directory when there is none
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("cliptrail"))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Settings {
    /// Load settings; missing or unreadable keys keep their defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut settings = Settings::default();

        // Load polling interval
        match store.get(POLL_INTERVAL_KEY) {
            Ok(Some(value)) => match value.trim().parse::<u64>() {
                Ok(ms) => settings.poll_interval_ms = ms,
                Err(_) => log::warn!("[Settings] Ignoring invalid {}: {:?}", POLL_INTERVAL_KEY, value),
            },
            Ok(None) => {}
            Err(e) => log::warn!("[Settings] Failed to read {}: {}", POLL_INTERVAL_KEY, e),
        }

        // Load image directory
        match store.get(IMAGE_DIR_KEY) {
            Ok(Some(value)) if !value.trim().is_empty() => settings.image_dir = PathBuf::from(value),
            Ok(_) => {}
            Err(e) => log::warn!("[Settings] Failed to read {}: {}", IMAGE_DIR_KEY, e),
        }

        settings
    }

    /// Save settings
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(POLL_INTERVAL_KEY, &self.poll_interval_ms.to_string())?;
        store.set(IMAGE_DIR_KEY, &self.image_dir.to_string_lossy())?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults_when_store_is_empty() {
        let store = MemoryStore::new();
        let settings = Settings::load(&store);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let settings = Settings {
            poll_interval_ms: 250,
            image_dir: PathBuf::from("/var/tmp/clips"),
        };
        settings.save(&store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let store = MemoryStore::new();
        store.set(POLL_INTERVAL_KEY, "fast").unwrap();
        store.set(IMAGE_DIR_KEY, "  ").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
