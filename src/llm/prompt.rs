//! Clickbait-detection prompt formatting.

use crate::extractor::PageData;

/// Page content beyond this many characters is cut before prompting, to stay
/// clear of model context limits.
pub const MAX_CONTENT_CHARS: usize = 5000;

/// Appended whenever content was cut.
pub const TRUNCATION_MARKER: &str = "... [content truncated]";

/// Deterministic template substitution; the only variable parts are the title
/// and the (possibly truncated) content.
pub fn clickbait_prompt(page: &PageData) -> String {
    let content = truncate_content(&page.content);

    format!(
        r#"You are an AI assistant tasked with detecting clickbait. I'll provide a webpage title and its content, and you need to determine if the title is clickbait.

Definition of clickbait: A title that makes exaggerated, misleading, or unfulfilled promises about the content to attract attention.

Page Title: "{title}"

Page Content (beginning):
{content}

Answer the following questions with brief explanations:
1. Does the title make specific promises or claims? If yes, what are they?
2. Are these promises or claims adequately fulfilled in the content?
3. Does the title use emotional language, hyperbole, or sensationalism?
4. Is there a significant mismatch between what the title suggests and what the content actually provides?

Based on these factors, provide your verdict: Is this title clickbait? Answer only with "CLICKBAIT" or "NOT CLICKBAIT" followed by a 1-2 sentence explanation."#,
        title = page.title,
    )
}

fn truncate_content(content: &str) -> String {
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((cut, _)) => format!("{}{}", &content[..cut], TRUNCATION_MARKER),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str, content: String) -> PageData {
        PageData {
            title: title.to_string(),
            content,
            url: "https://example.com".to_string(),
        }
    }

    #[test]
    fn long_content_is_cut_at_exactly_the_limit() {
        let content = "a".repeat(MAX_CONTENT_CHARS + 1000);
        let prompt = clickbait_prompt(&page("Title", content.clone()));

        let expected = format!("{}{}", &content[..MAX_CONTENT_CHARS], TRUNCATION_MARKER);
        assert!(prompt.contains(&expected));
        // Nothing beyond the limit leaks through.
        assert!(!prompt.contains(&content[..MAX_CONTENT_CHARS + 1]));
    }

    #[test]
    fn short_content_is_untouched() {
        let prompt = clickbait_prompt(&page("Title", "short body".to_string()));
        assert!(prompt.contains("short body"));
        assert!(!prompt.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn content_at_the_limit_is_not_marked() {
        let content = "b".repeat(MAX_CONTENT_CHARS);
        let prompt = clickbait_prompt(&page("Title", content));
        assert!(!prompt.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let content = "é".repeat(MAX_CONTENT_CHARS + 10);
        let prompt = clickbait_prompt(&page("Title", content));
        assert!(prompt.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn title_is_quoted_in_the_template() {
        let prompt = clickbait_prompt(&page("You Won't Believe This!", "body".to_string()));
        assert!(prompt.contains("Page Title: \"You Won't Believe This!\""));
    }
}
