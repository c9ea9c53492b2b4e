//! Main-content extraction from an HTML document.
//!
//! The same logic serves both pipelines: page analysis runs it over the HTML
//! the browser shim ships with the request, and the link analyzer runs it
//! over a page the daemon fetched itself.

pub mod model;

pub use model::{PageData, normalize_whitespace};

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// An element from this list is accepted as the main content if its trimmed
/// text is longer than `MIN_CONTENT_CHARS`. Order matters: first hit wins.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "[role=\"main\"]",
    "main",
    ".content",
    "#content",
    ".post-content",
    ".article-content",
    ".entry-content",
];

/// Boilerplate subtrees skipped when falling back to whole-body text.
const BOILERPLATE_SELECTORS: &[&str] = &[
    "script",
    "style",
    "nav",
    "header",
    "footer",
    "aside",
    ".sidebar",
    "#sidebar",
    ".navigation",
    ".menu",
    ".comments",
    ".ad",
    ".advertisement",
];

const MIN_CONTENT_CHARS: usize = 200;

static CONTENT: Lazy<Vec<Selector>> = Lazy::new(|| {
    CONTENT_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("Failed to parse content selector"))
        .collect()
});

static BOILERPLATE: Lazy<Vec<Selector>> = Lazy::new(|| {
    BOILERPLATE_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("Failed to parse boilerplate selector"))
        .collect()
});

static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("Failed to parse title selector"));
static BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("Failed to parse body selector"));

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("document has no body")]
    NoBody,

    #[error("document has no text content")]
    NoText,
}

/// Extract `PageData` from raw HTML.
pub fn extract(html: &str, url: &str) -> Result<PageData, ExtractError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let content = main_content(&document)?;

    Ok(PageData {
        title,
        content,
        url: url.to_string(),
    })
}

fn main_content(document: &Html) -> Result<String, ExtractError> {
    // First matching element with enough text wins.
    for selector in CONTENT.iter() {
        if let Some(element) = document.select(selector).next() {
            let text = normalize_whitespace(&element.text().collect::<String>());
            // The threshold counts characters, not bytes; multibyte pages
            // must not pass early.
            if text.chars().count() > MIN_CONTENT_CHARS {
                return Ok(text);
            }
        }
    }

    // Fallback: whole body minus boilerplate subtrees.
    let body = document.select(&BODY).next().ok_or(ExtractError::NoBody)?;
    let mut raw = String::new();
    collect_text(body, &mut raw);
    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        return Err(ExtractError::NoText);
    }
    Ok(text)
}

/// Depth-first text collection that skips boilerplate subtrees entirely.
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(el) = ElementRef::wrap(child) {
            if BOILERPLATE.iter().any(|s| s.matches(&el)) {
                continue;
            }
            collect_text(el, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}
