//! cliptrail - Content classifier
//!
//! Pure mapping from captured text to a content type and a set of `#labels`.
//! Labels are stripped before the type is inferred, so `#work user@example.com`
//! is still an email. Hex colors look like labels but are never treated as one.

use super::models::ContentType;
use super::patterns;

/// Result of classifying one piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub content_type: ContentType,
    /// Unique labels with the leading `#`, in order of first appearance
    pub labels: Vec<String>,
}

/// Classify `text`; total and deterministic
pub fn classify(text: &str) -> Classification {
    let mut labels: Vec<String> = Vec::new();
    let mut kept: Vec<&str> = Vec::new();

    for token in text.split_whitespace() {
        if is_label_candidate(token) {
            if !labels.iter().any(|l| l == token) {
                labels.push(token.to_string());
            }
        } else {
            kept.push(token);
        }
    }

    Classification {
        content_type: infer_type(&kept.join(" ")),
        labels,
    }
}

/// Text that type inference actually sees: `text` with label tokens removed
pub fn classification_text(text: &str) -> String {
    text.split_whitespace()
        .filter(|token| !is_label_candidate(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_label_candidate(token: &str) -> bool {
    patterns::is_label(token) && !patterns::is_hex_color(token)
}

/// First matching predicate wins; structural formats go before color/numeric ones
fn infer_type(text: &str) -> ContentType {
    if text.is_empty() {
        return ContentType::Text;
    }

    if patterns::is_email(text) {
        ContentType::Email
    } else if patterns::is_ip(text) {
        ContentType::Ip
    } else if patterns::is_url(text) {
        if patterns::has_image_extension(text) {
            ContentType::Image
        } else {
            ContentType::Url
        }
    } else if patterns::is_hex_color(text) || patterns::is_hsl(text) {
        ContentType::Color
    } else if patterns::is_mobile_phone(text) {
        ContentType::Phone
    } else if patterns::is_rgb_color(text) {
        ContentType::Color
    } else if patterns::is_btc_address(text) {
        ContentType::Btc
    } else if patterns::is_eth_address(text) {
        ContentType::Eth
    } else if patterns::is_json(text) {
        ContentType::Json
    } else if patterns::has_image_extension(text) {
        ContentType::Image
    } else {
        ContentType::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn type_of(text: &str) -> ContentType {
        classify(text).content_type
    }

    fn label_set(text: &str) -> HashSet<String> {
        classify(text).labels.into_iter().collect()
    }

    #[test]
    fn test_reference_cases() {
        assert_eq!(type_of("user@example.com"), ContentType::Email);
        assert_eq!(type_of("192.168.0.1"), ContentType::Ip);
        assert_eq!(type_of("https://example.com/photo.png"), ContentType::Image);

        assert_eq!(type_of("ff00aa"), ContentType::Color);
        assert_eq!(type_of("fff"), ContentType::Color);
        assert_eq!(type_of("deadbeef"), ContentType::Color);

        let color = classify("#ff00aa");
        assert_eq!(color.content_type, ContentType::Color);
        assert!(color.labels.is_empty());

        let notes = classify("#project_x meeting notes");
        assert_eq!(notes.content_type, ContentType::Text);
        assert_eq!(notes.labels, vec!["#project_x".to_string()]);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(type_of("https://example.com"), ContentType::Url);
        assert_eq!(type_of("Jane <jane@example.com>"), ContentType::Email);
        assert_eq!(type_of("hsl(0, 100%, 50%)"), ContentType::Color);
        assert_eq!(type_of("rgb(0,128,255)"), ContentType::Color);
        assert_eq!(type_of("rgb( 0 , 128 , 255 )"), ContentType::Text);
        assert_eq!(type_of("+82 10 1234 5678"), ContentType::Phone);
        assert_eq!(type_of("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2"), ContentType::Btc);
        assert_eq!(type_of("0x52908400098527886E0F7030069857D2E4169EE7"), ContentType::Eth);
        assert_eq!(type_of(r#"{"id": 7, "tags": ["a"]}"#), ContentType::Json);
        assert_eq!(type_of("C:\\Users\\me\\Desktop\\scan.JPG"), ContentType::Image);
        assert_eq!(type_of("just some words"), ContentType::Text);
        // A dotted IP is never read as a phone or a URL
        assert_eq!(type_of("10.0.0.254"), ContentType::Ip);
    }

    #[test]
    fn test_empty_and_label_only_text() {
        let empty = classify("");
        assert_eq!(empty.content_type, ContentType::Text);
        assert!(empty.labels.is_empty());

        let only_labels = classify("#a #b #a");
        assert_eq!(only_labels.content_type, ContentType::Text);
        assert_eq!(only_labels.labels, vec!["#a".to_string(), "#b".to_string()]);
    }

    #[test]
    fn test_labels_are_stripped_before_inference() {
        let tagged = classify("#links https://example.com #later");
        assert_eq!(tagged.content_type, ContentType::Url);
        assert_eq!(label_set("#links https://example.com #later"), label_set("#later #links"));
    }

    #[test]
    fn test_hex_tokens_stay_in_classification_text() {
        let c = classify("#abc #work");
        assert_eq!(c.content_type, ContentType::Color);
        assert_eq!(c.labels, vec!["#work".to_string()]);
        assert_eq!(classification_text("#abc #work"), "#abc");
    }

    #[test]
    fn test_unicode_labels() {
        assert_eq!(label_set("회의록 #회의 #meeting_2024"), ["#회의", "#meeting_2024"].iter().map(|s| s.to_string()).collect());
    }

    #[test]
    fn test_label_extraction_is_idempotent() {
        for text in [
            "#a plain #b text",
            "#fff #tag https://example.com",
            "#x_y #x_y   spaced\tout\n#z",
            "no labels at all",
            "#한글 #_",
        ] {
            let stripped = classification_text(text);
            assert!(classify(&stripped).labels.is_empty(), "leftover labels in {:?}", stripped);
            assert_eq!(classification_text(&stripped), stripped);
        }
    }

    #[test]
    fn test_classify_is_deterministic() {
        let inputs = ["", "   ", "#", "@", "a@b", "::", "[1,2", "rgb(", "0x", "\u{200b}"];
        for text in inputs {
            assert_eq!(classify(text), classify(text));
        }
    }
}
