//! cliptrail - OS clipboard access
//!
//! The engine only talks to the clipboard through [`ClipboardAccess`].
//! [`SystemClipboard`] is the arboard-backed implementation.

use std::io::Cursor;

use arboard::Clipboard;

/// Clipboard error type
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("Clipboard operation failed: {0}")]
    Operation(String),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        ClipboardError::Operation(err.to_string())
    }
}

/// Raw RGBA image read from the clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardImage {
    pub width: usize,
    pub height: usize,
    /// RGBA8 pixels, row-major
    pub bytes: Vec<u8>,
}

impl ClipboardImage {
    /// Content hash of the raw pixels (hex)
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.width as u64).to_le_bytes());
        hasher.update(&(self.height as u64).to_le_bytes());
        hasher.update(&self.bytes);
        hasher.finalize().to_hex().to_string()
    }

    /// Encode as PNG
    pub fn to_png(&self) -> Result<Vec<u8>, ClipboardError> {
        use image::{ImageBuffer, Rgba};

        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width as u32, self.height as u32, self.bytes.clone())
                .ok_or_else(|| {
                    ClipboardError::Operation(format!(
                        "pixel buffer does not match {}x{}",
                        self.width, self.height
                    ))
                })?;

        let mut png_data = Vec::new();
        img.write_to(&mut Cursor::new(&mut png_data), image::ImageFormat::Png)?;
        Ok(png_data)
    }
}

/// Clipboard content snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardSnapshot {
    /// Plain text content
    pub text: Option<String>,
    /// HTML flavor of the same copy
    pub html: Option<String>,
    /// Image flavor
    pub image: Option<ClipboardImage>,
}

impl ClipboardSnapshot {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// Clipboard capability consumed by the engine
pub trait ClipboardAccess: Send + Sync {
    /// Read whatever is currently on the clipboard
    fn read_current(&self) -> Result<ClipboardSnapshot, ClipboardError>;

    /// Replace the clipboard content; `html` is written alongside when present
    fn write_current(&self, text: &str, html: Option<&str>) -> Result<(), ClipboardError>;

    /// Empty the clipboard
    fn clear(&self) -> Result<(), ClipboardError>;
}

/// arboard-backed system clipboard
///
/// A fresh arboard handle is opened per call so every read sees the latest data.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    fn open() -> Result<Clipboard, ClipboardError> {
        Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

impl ClipboardAccess for SystemClipboard {
    fn read_current(&self) -> Result<ClipboardSnapshot, ClipboardError> {
        let mut clipboard = Self::open()?;

        // Missing flavors are normal; only the handle itself is a hard failure
        let text = clipboard.get_text().ok().filter(|t| !t.is_empty());
        let html = clipboard.get().html().ok().filter(|h| !h.is_empty());
        let image = match clipboard.get_image() {
            Ok(image) => {
                log::debug!("[Clipboard] Image flavor present: {}x{}", image.width, image.height);
                Some(ClipboardImage {
                    width: image.width,
                    height: image.height,
                    bytes: image.bytes.into_owned(),
                })
            }
            Err(_) => None,
        };

        Ok(ClipboardSnapshot { text, html, image })
    }

    fn write_current(&self, text: &str, html: Option<&str>) -> Result<(), ClipboardError> {
        let mut clipboard = Self::open()?;
        match html {
            Some(html) => clipboard.set_html(html, Some(text))?,
            None => clipboard.set_text(text)?,
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), ClipboardError> {
        let mut clipboard = Self::open()?;
        clipboard.clear()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(r: u8, g: u8, b: u8) -> ClipboardImage {
        ClipboardImage {
            width: 1,
            height: 1,
            bytes: vec![r, g, b, 255],
        }
    }

    #[test]
    fn test_content_hash_tracks_pixels() {
        assert_eq!(pixel(1, 2, 3).content_hash(), pixel(1, 2, 3).content_hash());
        assert_ne!(pixel(1, 2, 3).content_hash(), pixel(3, 2, 1).content_hash());
    }

    #[test]
    fn test_to_png_writes_png_signature() {
        let png = pixel(10, 20, 30).to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_to_png_rejects_short_buffer() {
        let broken = ClipboardImage {
            width: 2,
            height: 2,
            bytes: vec![0; 4],
        };
        assert!(broken.to_png().is_err());
    }
}
