//! Charset detection and decoding of fetched bodies.

use crate::fetcher::{errors::FetchError, types::Charset};
use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::Regex;

/// Only the head of the document is scanned for meta charset declarations.
const SNIFF_WINDOW: usize = 4096;

static HEADER_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).expect("Failed to parse charset regex")
});

static META_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#)
        .expect("Failed to parse meta charset regex")
});

/// Decode a response body to UTF-8, detecting the charset from the
/// Content-Type header, a `<meta charset>` tag, or byte-level sniffing.
pub fn decode_body(content_type: &str, body: &[u8]) -> Result<(String, Charset), FetchError> {
    let charset = detect_charset(content_type, body);
    let (decoded, _, had_errors) = charset.encoding().decode(body);
    if had_errors {
        return Err(FetchError::Charset(format!(
            "body does not decode as {}",
            charset.encoding().name()
        )));
    }
    Ok((decoded.into_owned(), charset))
}

fn detect_charset(content_type: &str, body: &[u8]) -> Charset {
    if let Some(encoding) = labelled_encoding(&HEADER_CHARSET, content_type) {
        return Charset::from_encoding(encoding);
    }

    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_WINDOW)]);
    if let Some(encoding) = labelled_encoding(&META_CHARSET, &head) {
        return Charset::from_encoding(encoding);
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(&body[..body.len().min(SNIFF_WINDOW)], false);
    Charset::from_encoding(detector.guess(None, true))
}

fn labelled_encoding(pattern: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = pattern.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}
