//! Configuration file loading
//!
//! `groundwork.toml` in the working directory (or the file passed with
//! `--config`) is read into [`ResearchConfig`]. Every field has a default, so
//! an absent file or a partial one is fine. CLI flags are applied on top via
//! [`ConfigOverrides`].

use crate::capability::{
    DEFAULT_DOCS_ENDPOINT, DEFAULT_MAX_CONTENT_CHARS, DEFAULT_SEARCH_ENDPOINT, DEFAULT_TIMEOUT,
};
use crate::domain::dependency_key;
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "groundwork.toml";

/// Environment variable holding the Context7 API key
pub const DOCS_API_KEY_ENV: &str = "CONTEXT7_API_KEY";

/// Complete research configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResearchConfig {
    pub research: ResearchSection,
    pub search: SearchSection,
    pub fetch: FetchSection,
    pub docs: DocsSection,
    pub extractor: ExtractorSection,
}

/// `[research]`: orchestration policy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResearchSection {
    /// URLs fetched per dependency
    pub max_urls: usize,
    /// Dependencies researched at once
    pub concurrency: usize,
    /// Delay before the single fetch retry
    pub retry_backoff_ms: u64,
}

impl Default for ResearchSection {
    fn default() -> Self {
        Self {
            max_urls: 3,
            concurrency: 4,
            retry_backoff_ms: 500,
        }
    }
}

/// `[search]`: SearXNG binding
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSection {
    pub endpoint: String,
    pub max_results: usize,
    /// Dependency name -> site to narrow the search to
    pub domains: BTreeMap<String, String>,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            max_results: 5,
            domains: BTreeMap::new(),
        }
    }
}

/// `[fetch]`: URL fetch binding
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSection {
    pub timeout_secs: u64,
    pub max_content_chars: usize,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

/// `[docs]`: Context7 binding
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsSection {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub tokens: u32,
}

impl Default for DocsSection {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DOCS_ENDPOINT.to_string(),
            api_key: None,
            tokens: 2000,
        }
    }
}

impl DocsSection {
    /// API key from the file, else from the environment
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(DOCS_API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// `[extractor]`: additional library names to recognise
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorSection {
    pub known: Vec<String>,
}

/// Values given on the command line, applied over the file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub max_urls: Option<usize>,
    pub concurrency: Option<usize>,
    pub search_endpoint: Option<String>,
    pub docs_endpoint: Option<String>,
    pub domains: Vec<(String, String)>,
}

impl ResearchConfig {
    /// Load the configuration
    ///
    /// An explicit path must exist. Without one, `groundwork.toml` in the
    /// working directory is used when present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(&default_path)
                } else {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::parse(&content, path)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse TOML content; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply command-line overrides
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(max_urls) = overrides.max_urls {
            self.research.max_urls = max_urls;
        }
        if let Some(concurrency) = overrides.concurrency {
            self.research.concurrency = concurrency;
        }
        if let Some(endpoint) = overrides.search_endpoint {
            self.search.endpoint = endpoint;
        }
        if let Some(endpoint) = overrides.docs_endpoint {
            self.docs.endpoint = endpoint;
        }
        for (name, host) in overrides.domains {
            self.search.domains.insert(name, host);
        }
    }

    /// Reject values the research run cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.research.concurrency == 0 {
            return Err(ConfigError::invalid_value(
                "research.concurrency",
                "must be at least 1",
            ));
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::invalid_value(
                "search.max_results",
                "must be at least 1",
            ));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "fetch.timeout_secs",
                "must be at least 1",
            ));
        }
        if self.fetch.max_content_chars == 0 {
            return Err(ConfigError::invalid_value(
                "fetch.max_content_chars",
                "must be at least 1",
            ));
        }
        check_endpoint("search.endpoint", &self.search.endpoint)?;
        check_endpoint("docs.endpoint", &self.docs.endpoint)?;
        Ok(())
    }

    /// Site hint for a dependency, matched case-insensitively
    pub fn domain_hint(&self, dependency: &str) -> Option<&str> {
        let key = dependency_key(dependency);
        self.search
            .domains
            .iter()
            .find(|(name, _)| dependency_key(name) == key)
            .map(|(_, host)| host.as_str())
    }
}

fn check_endpoint(key: &str, endpoint: &str) -> Result<(), ConfigError> {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::invalid_value(
            key,
            format!("'{}' is not an http(s) URL", endpoint),
        ))
    }
}

/// Parse a `NAME=HOST` domain hint
pub fn parse_domain_hint(s: &str) -> Result<(String, String), String> {
    let (name, host) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=HOST, got '{}'", s))?;
    let (name, host) = (name.trim(), host.trim());
    if name.is_empty() || host.is_empty() {
        return Err(format!("expected NAME=HOST, got '{}'", s));
    }
    Ok((name.to_string(), host.to_string()))
}
