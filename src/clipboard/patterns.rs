//! cliptrail - Content recognition predicates
//!
//! Each predicate answers whether a whole string is one kind of structured value.
//! Regex tables are compiled once and shared.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use once_cell::sync::Lazy;
use regex::Regex;

/// Image extensions, matched case-sensitively in both cases
pub const IMAGE_EXTENSIONS: [&str; 6] = [".png", ".PNG", ".jpg", ".JPG", ".jpeg", ".JPEG"];

const NUMBER: &str = r"[+-]?(?:\d+(?:\.\d+)?|\.\d+)";

static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#\w+$").expect("valid label regex"));

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#?(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
        .expect("valid hex color regex")
});

static EMAIL_DISPLAY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^<>]*<([^<>\s]+)>$").expect("valid display name regex"));

static EMAIL_LOCAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w!#$%&'*+/=?^`{|}~-]+(?:\.[\w!#$%&'*+/=?^`{|}~-]+)*$")
        .expect("valid email local part regex")
});

static DOMAIN_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?$").expect("valid domain label regex"));

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?i:https?|ftp)://)?(?:[^\s:@/]+(?::[^\s@/]*)?@)?(?P<host>\[[0-9a-fA-F:.]+\]|[^\s/:?#\[\]@]+)(?::(?P<port>\d{1,5}))?(?:[/?#]\S*)?$",
    )
    .expect("valid url regex")
});

static HSL_COMMA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^hsla?\(\s*{n}(?:deg|grad|rad|turn)?\s*(?:,\s*{n}%\s*){{2}}(?:,\s*{n}%?\s*)?\)$",
        n = NUMBER
    ))
    .expect("valid hsl regex")
});

static HSL_SPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^hsla?\(\s*{n}(?:deg|grad|rad|turn)?(?:\s+{n}%){{2}}\s*(?:/\s*{n}%?\s*)?\)$",
        n = NUMBER
    ))
    .expect("valid hsl regex")
});

const RGB_CHANNEL: &str = r"(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)";
const RGB_PERCENT: &str = r"(?:100|[1-9]?\d)%";
const RGB_ALPHA: &str = r"(?:0?\.\d|1(?:\.0)?|0(?:\.0)?)";

static RGB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?:rgb\((?:{c},){{2}}{c}\)|rgba\((?:{c},){{3}}{a}\)|rgb\((?:{p},){{2}}{p}\)|rgba\((?:{p},){{3}}{a}\))$",
        c = RGB_CHANNEL,
        p = RGB_PERCENT,
        a = RGB_ALPHA
    ))
    .expect("valid rgb regex")
});

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d(][\d\s().-]*\d$").expect("valid phone regex"));

static BTC_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:bc1[a-z0-9]{25,39}|[13][A-HJ-NP-Za-km-z1-9]{25,39})$").expect("valid btc regex")
});

static ETH_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid eth regex"));

/// `#word` token (Unicode letters, digits and underscore)
pub fn is_label(token: &str) -> bool {
    LABEL.is_match(token)
}

/// 3, 4, 6 or 8 hex digits with an optional leading `#`
pub fn is_hex_color(s: &str) -> bool {
    HEX_COLOR.is_match(s)
}

/// Email address, optionally in `Display Name <address>` form; no TLD required
pub fn is_email(s: &str) -> bool {
    let address = match EMAIL_DISPLAY_NAME.captures(s) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(""),
        None => s,
    };
    if address.is_empty() || address.len() > 254 {
        return false;
    }

    let Some((local, domain)) = address.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().count() > 64 || !EMAIL_LOCAL.is_match(local) {
        return false;
    }
    is_hostname(domain, false)
}

/// IPv4 or IPv6 address; IPv6 may carry a `%zone` suffix
pub fn is_ip(s: &str) -> bool {
    if s.parse::<IpAddr>().is_ok() {
        return true;
    }
    match s.split_once('%') {
        Some((addr, zone)) => !zone.is_empty() && addr.parse::<Ipv6Addr>().is_ok(),
        None => false,
    }
}

/// http/https/ftp URL with the protocol optional; the host needs a TLD unless it is an IP
pub fn is_url(s: &str) -> bool {
    if s.len() > 2083 || s.to_ascii_lowercase().starts_with("mailto:") {
        return false;
    }
    // A scheme other than the accepted ones must not slip through as userinfo or host
    if let Some((scheme, _)) = s.split_once("://") {
        let scheme = scheme.to_ascii_lowercase();
        if !matches!(scheme.as_str(), "http" | "https" | "ftp") {
            return false;
        }
    }

    let Some(caps) = URL.captures(s) else {
        return false;
    };
    if let Some(port) = caps.name("port") {
        match port.as_str().parse::<u32>() {
            Ok(p) if p > 0 && p <= 65_535 => {}
            _ => return false,
        }
    }

    let host = caps.name("host").map(|m| m.as_str()).unwrap_or("");
    if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        return inner.parse::<Ipv6Addr>().is_ok();
    }
    host.parse::<Ipv4Addr>().is_ok() || is_hostname(host, true)
}

/// Dot-separated host labels; with `require_tld` the last label must be alphabetic (or punycode)
fn is_hostname(host: &str, require_tld: bool) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() || host.len() > 253 {
        return false;
    }

    let labels: Vec<&str> = host.split('.').collect();
    let labels_ok = labels
        .iter()
        .all(|label| label.chars().count() <= 63 && DOMAIN_LABEL.is_match(label));
    if !labels_ok {
        return false;
    }

    if require_tld {
        if labels.len() < 2 {
            return false;
        }
        let tld = labels[labels.len() - 1];
        let alphabetic = tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic);
        return alphabetic || tld.to_ascii_lowercase().starts_with("xn--");
    }
    true
}

/// `hsl()`/`hsla()` in comma or space syntax
pub fn is_hsl(s: &str) -> bool {
    if s.contains(',') {
        HSL_COMMA.is_match(s)
    } else {
        HSL_SPACE.is_match(s)
    }
}

/// `rgb(r,g,b)` or `rgba(r,g,b,a)` without spaces or leading zeros
///
/// Channels are all integers 0-255 or all percentages 0-100; alpha is 0-1 with at
/// most one decimal.
pub fn is_rgb_color(s: &str) -> bool {
    RGB.is_match(s)
}

/// Mobile phone number: digits with common separators, 9 to 15 digits in total
pub fn is_mobile_phone(s: &str) -> bool {
    if !PHONE.is_match(s) {
        return false;
    }
    let digits = s.chars().filter(char::is_ascii_digit).count();
    if !(9..=15).contains(&digits) {
        return false;
    }
    // Separators never run together and parentheses stay balanced
    let doubled = s
        .as_bytes()
        .windows(2)
        .any(|w| matches!(w[0], b' ' | b'-' | b'.') && matches!(w[1], b' ' | b'-' | b'.'));
    let opens = s.matches('(').count();
    !doubled && opens == s.matches(')').count() && opens <= 1
}

/// Legacy base58 (`1...`/`3...`) or bech32 (`bc1...`) Bitcoin address
pub fn is_btc_address(s: &str) -> bool {
    BTC_ADDRESS.is_match(s)
}

/// `0x` followed by 40 hex digits
pub fn is_eth_address(s: &str) -> bool {
    ETH_ADDRESS.is_match(s)
}

/// JSON object or array, or one of the keyword primitives `null`/`true`/`false`
pub fn is_json(s: &str) -> bool {
    match serde_json::from_str::<serde_json::Value>(s) {
        Ok(value) => matches!(
            value,
            serde_json::Value::Object(_)
                | serde_json::Value::Array(_)
                | serde_json::Value::Null
                | serde_json::Value::Bool(_)
        ),
        Err(_) => false,
    }
}

/// Ends with one of [`IMAGE_EXTENSIONS`]
pub fn has_image_extension(s: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| s.ends_with(ext))
}
