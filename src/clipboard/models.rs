//! cliptrail - Clipboard history data models
//!
//! Defines the captured entry, its persisted record form, and the content type enum

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::classifier;

/// Classified content type of a captured entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Plain text (default)
    Text,
    Email,
    Ip,
    Url,
    /// Image URL, image file name, or captured image
    Image,
    /// Hex, HSL or RGB color
    Color,
    Phone,
    /// Bitcoin address
    Btc,
    /// Ethereum address
    Eth,
    Json,
}

impl ContentType {
    /// Convert from string to ContentType
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "text" => Some(ContentType::Text),
            "email" => Some(ContentType::Email),
            "ip" => Some(ContentType::Ip),
            "url" => Some(ContentType::Url),
            "image" => Some(ContentType::Image),
            "color" => Some(ContentType::Color),
            "phone" => Some(ContentType::Phone),
            "BTC" => Some(ContentType::Btc),
            "ETH" => Some(ContentType::Eth),
            "JSON" => Some(ContentType::Json),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Email => "email",
            ContentType::Ip => "ip",
            ContentType::Url => "url",
            ContentType::Image => "image",
            ContentType::Color => "color",
            ContentType::Phone => "phone",
            ContentType::Btc => "BTC",
            ContentType::Eth => "ETH",
            ContentType::Json => "JSON",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Serialized as its plain name so records stay readable by older versions
impl Serialize for ContentType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// Unknown names fall back to text instead of rejecting the whole record
impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(ContentType::from_str(&value).unwrap_or_else(|| {
            log::warn!("[Models] Unknown content type '{}', treating as text", value);
            ContentType::Text
        }))
    }
}

/// Entry record error type
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("Invalid capture time '{value}': {source}")]
    InvalidTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// One clipboard capture
///
/// Everything except `pinned` is fixed at construction. `content_type` and
/// `labels` are a snapshot of the classifier's output for `text` and are never
/// recomputed, including when restored from a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    text: String,
    rich_content: Option<String>,
    captured_at: DateTime<Utc>,
    content_type: ContentType,
    labels: Vec<String>,
    pinned: bool,
}

impl Entry {
    /// Create a new entry, classifying `text` once
    pub fn new(text: String, rich_content: Option<String>, captured_at: DateTime<Utc>) -> Self {
        let classification = classifier::classify(&text);
        Self {
            text,
            rich_content,
            captured_at,
            content_type: classification.content_type,
            labels: classification.labels,
            pinned: false,
        }
    }

    /// Restore an entry from its persisted record without re-classifying
    pub fn from_record(record: EntryRecord) -> Result<Self, EntryError> {
        let captured_at = DateTime::parse_from_rfc3339(&record.time)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|source| EntryError::InvalidTime {
                value: record.time.clone(),
                source,
            })?;

        Ok(Self {
            text: record.text,
            rich_content: record.html,
            captured_at,
            content_type: record.content_type,
            labels: record.tags,
            pinned: record.pinned,
        })
    }

    /// Flatten into the persisted record form
    pub fn to_record(&self) -> EntryRecord {
        EntryRecord {
            text: self.text.clone(),
            html: self.rich_content.clone(),
            time: format_time(&self.captured_at),
            content_type: self.content_type,
            tags: self.labels.clone(),
            pinned: self.pinned,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rich_content(&self) -> Option<&str> {
        self.rich_content.as_deref()
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn pin(&mut self) {
        self.pinned = true;
    }

    pub fn unpin(&mut self) {
        self.pinned = false;
    }

    /// Single-line preview of the text, at most `max_len` characters plus an ellipsis
    pub fn preview(&self, max_len: usize) -> String {
        let text = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.chars().count() <= max_len {
            text
        } else {
            let truncated: String = text.chars().take(max_len).collect();
            format!("{}...", truncated)
        }
    }
}

/// Persisted form of an [`Entry`] (storage key `"data"` holds an array of these)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub text: String,
    #[serde(default, alias = "richContent", skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// RFC 3339 capture time
    pub time: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pinned: bool,
}

/// Format a capture time the way records store it
///
/// `AutoSi` keeps every significant sub-second digit so parsing gives back the
/// identical instant.
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
