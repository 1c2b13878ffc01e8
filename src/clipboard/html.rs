//! cliptrail - HTML flavor helpers

use once_cell::sync::Lazy;
use regex::Regex;

static IMG_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("valid img src regex")
});

static BLOCK_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<\s*(?:br|/p|/div|/li|/tr|/h[1-6])\b[^>]*>").expect("valid block regex")
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));

static SCRIPT_OR_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(?:script|style)\s*>").expect("valid script regex")
});

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\r\f]+").expect("valid blank regex"));

/// File name of the first `<img src>` that points at a real resource
///
/// `data:` URIs are inline bytes, not a referencable file, so they yield `None`.
pub fn image_file_name(html: &str) -> Option<String> {
    let caps = IMG_SRC.captures(html)?;
    let src = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?.as_str().trim();
    if src.is_empty() || src.to_ascii_lowercase().starts_with("data:") {
        return None;
    }

    let path = src.split(['?', '#']).next().unwrap_or("");
    let name = path.trim_end_matches('/').rsplit(['/', '\\']).next().unwrap_or("");
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Plain-text rendering of an HTML fragment: tags dropped, block ends become
/// line breaks, common entities decoded, blank runs collapsed
pub fn html_to_text(html: &str) -> String {
    let without_code = SCRIPT_OR_STYLE.replace_all(html, "");
    let with_breaks = BLOCK_BREAK.replace_all(&without_code, "\n");
    let stripped = TAG.replace_all(&with_breaks, "");
    let decoded = decode_entities(&stripped);

    decoded
        .lines()
        .map(|line| BLANK_RUN.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        // Last, so "&amp;lt;" becomes "&lt;" and not "<"
        .replace("&amp;", "&")
}
