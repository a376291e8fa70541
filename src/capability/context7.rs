//! Context7 structured documentation binding
//!
//! Library search: {endpoint}/search?query={name}
//! Documentation: {endpoint}{library_id}?type=txt&topic={question}&tokens={n}

use crate::capability::{DocSnippet, DocsCapability, HttpClient};
use crate::error::CapabilityError;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// Default Context7 API endpoint
pub const DEFAULT_DOCS_ENDPOINT: &str = "https://context7.com/api/v1";

/// Snippet separator line in text responses
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^-{10,}\s*$").unwrap());

/// Structured documentation through Context7
pub struct Context7Docs {
    client: HttpClient,
    endpoint: String,
    api_key: Option<String>,
    tokens: u32,
}

/// Library search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<LibraryResult>,
}

/// One library candidate
#[derive(Debug, Deserialize)]
struct LibraryResult {
    id: String,
    #[serde(default)]
    title: String,
}

impl Context7Docs {
    /// Create a new docs binding
    pub fn new(
        client: HttpClient,
        endpoint: impl Into<String>,
        api_key: Option<String>,
        tokens: u32,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
            tokens,
        }
    }

    fn build_search_url(&self, name: &str) -> String {
        format!("{}/search?query={}", self.endpoint, urlencoding::encode(name))
    }

    fn build_docs_url(&self, library_id: &str, question: &str) -> String {
        let id = if library_id.starts_with('/') {
            library_id.to_string()
        } else {
            format!("/{}", library_id)
        };
        format!(
            "{}{}?type=txt&topic={}&tokens={}",
            self.endpoint,
            id,
            urlencoding::encode(question),
            self.tokens
        )
    }

    /// Public page of a library, used when a snippet carries no source
    fn library_page(&self, library_id: &str) -> String {
        let root = match self.endpoint.find("/api") {
            Some(idx) => &self.endpoint[..idx],
            None => self.endpoint.as_str(),
        };
        format!("{}/{}", root, library_id.trim_start_matches('/'))
    }

    fn bearer(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// Pick the library whose title matches the name, else the top-ranked one
fn pick_library(name: &str, results: Vec<LibraryResult>) -> Option<String> {
    let wanted = name.trim().to_lowercase();
    let exact = results
        .iter()
        .position(|r| r.title.trim().to_lowercase() == wanted);
    let index = exact.unwrap_or(0);
    results
        .into_iter()
        .nth(index)
        .map(|r| r.id)
        .filter(|id| !id.trim().is_empty())
}

/// Split a text response into snippets with their SOURCE lines
fn parse_snippets(body: &str, fallback_url: &str) -> Vec<DocSnippet> {
    SEPARATOR_RE
        .split(body)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            let source = block
                .lines()
                .find_map(|line| line.trim().strip_prefix("SOURCE:"))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| fallback_url.to_string());
            DocSnippet::new(block, source)
        })
        .collect()
}

#[async_trait]
impl DocsCapability for Context7Docs {
    fn name(&self) -> &'static str {
        "context7"
    }

    async fn resolve_id(&self, name: &str) -> Result<String, CapabilityError> {
        let url = self.build_search_url(name);
        let response: Option<SearchResponse> =
            self.client.get_json_optional(&url, self.bearer()).await?;
        response
            .and_then(|r| pick_library(name, r.results))
            .ok_or_else(|| CapabilityError::not_found(name))
    }

    async fn query_docs(
        &self,
        library_id: &str,
        question: &str,
    ) -> Result<Vec<DocSnippet>, CapabilityError> {
        let url = self.build_docs_url(library_id, question);
        let body = self.client.get_text(&url, self.bearer()).await?;
        Ok(parse_snippets(&body, &self.library_page(library_id)))
    }
}
