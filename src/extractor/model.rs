use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// What the extractor hands to the prompt builder: the page title, the main
/// body text, and the page URL. Ephemeral, produced per extraction call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageData {
    pub title: String,
    pub content: String,
    pub url: String,
}

static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to parse whitespace regex"));

/// Collapse every run of whitespace (including newlines) to a single space
/// and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUNS.replace_all(text, " ").trim().to_string()
}
