//! URL fetch binding
//!
//! Plain HTTP GET. HTML bodies are reduced to readable text and every body
//! is truncated to a character budget so findings stay reviewable.

use crate::capability::{FetchCapability, FetchedPage, HttpClient};
use crate::error::CapabilityError;
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

/// Default content budget in characters
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 4000;

/// Script, style and noscript blocks including their content
static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script>|<style\b.*?</style>|<noscript\b.*?</noscript>|<!--.*?-->")
        .unwrap()
});

/// Block-level tags that end a line of text
static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(?:br|/p|/div|/li|/h[1-6]|/tr|/pre|/section|/article)\b[^>]*>").unwrap()
});

/// Any remaining tag
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Numeric character references
static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").unwrap());

/// Runs of horizontal whitespace
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\r\f\v]+").unwrap());

/// Three or more line breaks
static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n\s*\n+").unwrap());

/// Fetch binding over HTTP
pub struct HttpFetcher {
    client: HttpClient,
    max_content_chars: usize,
}

impl HttpFetcher {
    /// Create a new fetcher
    pub fn new(client: HttpClient, max_content_chars: usize) -> Self {
        Self {
            client,
            max_content_chars,
        }
    }
}

#[async_trait]
impl FetchCapability for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<FetchedPage, CapabilityError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CapabilityError::invalid_response(
                url,
                "only http and https URLs can be fetched",
            ));
        }

        let body = self.client.get_text(url, None).await?;
        let text = if looks_like_html(&body) {
            html_to_text(&body)
        } else {
            body.trim().to_string()
        };

        if text.is_empty() {
            return Err(CapabilityError::invalid_response(url, "empty page"));
        }

        Ok(FetchedPage::new(url, truncate_chars(&text, self.max_content_chars)))
    }
}

fn looks_like_html(body: &str) -> bool {
    let head: String = body.chars().take(512).collect::<String>().to_lowercase();
    head.contains("<html") || head.contains("<!doctype html") || head.contains("<body")
}

/// Reduce an HTML document to plain text
pub fn html_to_text(html: &str) -> String {
    let text = BLOCK_RE.replace_all(html, " ");
    let text = BREAK_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, " ");
    let text = decode_entities(&text);

    let lines: Vec<String> = text
        .lines()
        .map(|line| SPACE_RE.replace_all(line, " ").trim().to_string())
        .collect();
    let joined = lines.join("\n");

    BLANK_LINES_RE
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}

fn decode_entities(text: &str) -> String {
    let text = NUMERIC_ENTITY_RE.replace_all(text, |caps: &regex::Captures| {
        let raw = &caps[1];
        let code = match raw.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(|c| c.to_string())
            .unwrap_or_default()
    });

    // &amp; last so "&amp;lt;" stays "&lt;"
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Truncate to at most `max` characters, marking the cut
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max).collect();
    truncated.push_str(" [...]");
    truncated
}
