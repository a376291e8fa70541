//! Research capabilities
//!
//! This module provides:
//! - HTTP client shared foundation
//! - Web search through SearXNG
//! - URL fetch with HTML-to-text reduction
//! - Structured documentation queries through Context7
//!
//! Each capability sits behind an async trait so the orchestrator can be
//! driven by in-memory fakes in tests.

mod client;
mod context7;
mod searxng;
mod web;

pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use context7::{Context7Docs, DEFAULT_DOCS_ENDPOINT};
pub use searxng::{SearxngSearch, DEFAULT_SEARCH_ENDPOINT};
pub use web::{html_to_text, truncate_chars, HttpFetcher, DEFAULT_MAX_CONTENT_CHARS};

use crate::config::ResearchConfig;
use crate::error::CapabilityError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Result URL
    pub url: String,
    /// Text the search engine shows for the result
    pub snippet: String,
}

impl SearchHit {
    pub fn new(url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// Content read from a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL that was read
    pub url: String,
    /// Page text, already reduced from HTML and truncated
    pub content: String,
}

impl FetchedPage {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
        }
    }
}

/// A documentation excerpt returned by a structured query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSnippet {
    /// Excerpt text
    pub snippet: String,
    /// Page the excerpt was taken from
    pub source_url: String,
}

impl DocSnippet {
    pub fn new(snippet: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            snippet: snippet.into(),
            source_url: source_url.into(),
        }
    }
}

/// Web search
#[async_trait]
pub trait SearchCapability: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &'static str;

    /// Search the web; an empty result is not an error
    async fn search(
        &self,
        query: &str,
        domain_hint: Option<&str>,
    ) -> Result<Vec<SearchHit>, CapabilityError>;
}

/// Direct URL fetch
#[async_trait]
pub trait FetchCapability: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &'static str;

    /// Read the content behind a URL
    async fn fetch(&self, url: &str) -> Result<FetchedPage, CapabilityError>;
}

/// Structured documentation lookup
#[async_trait]
pub trait DocsCapability: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &'static str;

    /// Resolve a dependency name to a library id, or fail with `NotFound`
    async fn resolve_id(&self, name: &str) -> Result<String, CapabilityError>;

    /// Query the documentation of a resolved library
    async fn query_docs(
        &self,
        library_id: &str,
        question: &str,
    ) -> Result<Vec<DocSnippet>, CapabilityError>;
}

/// The three capabilities a research run is driven by
#[derive(Clone)]
pub struct Capabilities {
    pub search: Arc<dyn SearchCapability>,
    pub fetch: Arc<dyn FetchCapability>,
    pub docs: Arc<dyn DocsCapability>,
}

impl Capabilities {
    pub fn new(
        search: Arc<dyn SearchCapability>,
        fetch: Arc<dyn FetchCapability>,
        docs: Arc<dyn DocsCapability>,
    ) -> Self {
        Self {
            search,
            fetch,
            docs,
        }
    }
}

/// Create the HTTP-backed capabilities described by the configuration
pub fn create_capabilities(config: &ResearchConfig) -> Result<Capabilities, CapabilityError> {
    let client = HttpClient::with_timeout(Duration::from_secs(config.fetch.timeout_secs))?;

    let search = SearxngSearch::new(
        client.clone(),
        config.search.endpoint.clone(),
        config.search.max_results,
    );
    let fetch = HttpFetcher::new(client.clone(), config.fetch.max_content_chars);
    let docs = Context7Docs::new(
        client,
        config.docs.endpoint.clone(),
        config.docs.resolved_api_key(),
        config.docs.tokens,
    );

    Ok(Capabilities::new(
        Arc::new(search),
        Arc::new(fetch),
        Arc::new(docs),
    ))
}
