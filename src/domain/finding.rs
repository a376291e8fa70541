//! Findings and coverage gaps recorded during research

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The research capability that produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Web search (URL + snippet)
    Search,
    /// Direct URL fetch (full page content)
    Fetch,
    /// Structured documentation query
    StructuredQuery,
}

impl Capability {
    /// Returns the display name for this capability
    pub fn display_name(&self) -> &'static str {
        match self {
            Capability::Search => "search",
            Capability::Fetch => "fetch",
            Capability::StructuredQuery => "structured-query",
        }
    }

    /// Returns all capabilities
    pub fn all() -> &'static [Capability] {
        &[
            Capability::Search,
            Capability::Fetch,
            Capability::StructuredQuery,
        ]
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A recorded piece of evidence for one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Name of the dependency this finding supports
    pub dependency: String,
    /// Where the content came from
    pub source_url: String,
    /// How the content was obtained
    pub capability: Capability,
    /// Extracted text
    pub content: String,
    /// Version the content applies to (empty when unknown)
    #[serde(default)]
    pub version: String,
    /// When the finding was recorded
    pub retrieved_at: DateTime<Utc>,
}

impl Finding {
    /// Creates a new finding without version information
    pub fn new(
        dependency: impl Into<String>,
        source_url: impl Into<String>,
        capability: Capability,
        content: impl Into<String>,
        retrieved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            dependency: dependency.into(),
            source_url: source_url.into(),
            capability,
            content: content.into(),
            version: String::new(),
            retrieved_at,
        }
    }

    /// Sets the version this finding applies to (builder pattern)
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Returns true if the finding carries a version
    pub fn has_version(&self) -> bool {
        !self.version.trim().is_empty()
    }

    /// Returns true if the finding carries a source URL
    pub fn has_citation(&self) -> bool {
        !self.source_url.trim().is_empty()
    }

    /// Returns true if both findings describe the same (url, capability) pair
    pub fn same_source(&self, other: &Finding) -> bool {
        self.capability == other.capability && self.source_url == other.source_url
    }
}

/// A research step that did not produce evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    /// Name of the dependency being researched
    pub dependency: String,
    /// The capability that failed or came back empty
    pub capability: Capability,
    /// Query, URL or library name the capability was called with
    pub target: String,
    /// Human-readable failure reason
    pub reason: String,
}

impl CoverageGap {
    /// Creates a new coverage gap
    pub fn new(
        dependency: impl Into<String>,
        capability: Capability,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            dependency: dependency.into(),
            capability,
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if both gaps describe the same (capability, target) pair
    pub fn same_target(&self, other: &CoverageGap) -> bool {
        self.capability == other.capability && self.target == other.target
    }
}

impl fmt::Display for CoverageGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.capability, self.target, self.reason)
    }
}
