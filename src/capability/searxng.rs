//! SearXNG search binding
//!
//! Queries a SearXNG instance through its JSON API.
//! API endpoint: {endpoint}/search?q={query}&format=json

use crate::capability::{HttpClient, SearchCapability, SearchHit};
use crate::error::CapabilityError;
use async_trait::async_trait;
use serde::Deserialize;

/// Default SearXNG endpoint (a local instance)
pub const DEFAULT_SEARCH_ENDPOINT: &str = "http://localhost:8888";

/// Web search through SearXNG
pub struct SearxngSearch {
    client: HttpClient,
    endpoint: String,
    max_results: usize,
}

/// SearXNG search response
#[derive(Debug, Deserialize)]
struct SearxngResponse {
    /// Ranked results
    #[serde(default)]
    results: Vec<SearxngResult>,
}

/// One SearXNG result
#[derive(Debug, Deserialize)]
struct SearxngResult {
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

impl SearxngSearch {
    /// Create a new search binding
    pub fn new(client: HttpClient, endpoint: impl Into<String>, max_results: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            max_results,
        }
    }

    /// Build the request URL; a domain hint becomes a `site:` filter
    fn build_url(&self, query: &str, domain_hint: Option<&str>) -> String {
        let query = match domain_hint {
            Some(domain) if !domain.trim().is_empty() => {
                format!("{} site:{}", query, domain.trim())
            }
            _ => query.to_string(),
        };
        format!(
            "{}/search?q={}&format=json",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(&query)
        )
    }
}

#[async_trait]
impl SearchCapability for SearxngSearch {
    fn name(&self) -> &'static str {
        "searxng"
    }

    async fn search(
        &self,
        query: &str,
        domain_hint: Option<&str>,
    ) -> Result<Vec<SearchHit>, CapabilityError> {
        let url = self.build_url(query, domain_hint);
        let response: SearxngResponse = self.client.get_json(&url, None).await?;

        let hits = response
            .results
            .into_iter()
            .filter(|r| !r.url.trim().is_empty())
            .take(self.max_results)
            .map(|r| {
                let snippet = if r.content.trim().is_empty() {
                    r.title
                } else {
                    r.content
                };
                SearchHit::new(r.url, snippet)
            })
            .collect();

        Ok(hits)
    }
}
