//! Checklist validation result types
//!
//! Provides structures for tracking checklist outcomes at dependency and
//! overall levels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One item of the research checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecklistItem {
    /// At least one finding exists
    Discovery,
    /// At least one page was actually fetched and read
    ContentRead,
    /// At least one finding states the version it applies to
    VersionStated,
    /// Every finding carries a source URL
    CitationPresent,
}

impl ChecklistItem {
    /// Returns the display name for this item
    pub fn display_name(&self) -> &'static str {
        match self {
            ChecklistItem::Discovery => "discovery",
            ChecklistItem::ContentRead => "content-read",
            ChecklistItem::VersionStated => "version-stated",
            ChecklistItem::CitationPresent => "citation-present",
        }
    }

    /// Returns all checklist items in report order
    pub fn all() -> &'static [ChecklistItem] {
        &[
            ChecklistItem::Discovery,
            ChecklistItem::ContentRead,
            ChecklistItem::VersionStated,
            ChecklistItem::CitationPresent,
        ]
    }
}

impl fmt::Display for ChecklistItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Checklist outcome for a single dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Dependency name
    pub dependency: String,
    /// Checklist items that are not met
    pub unmet: BTreeSet<ChecklistItem>,
}

impl ValidationResult {
    /// Creates a result with every item met
    pub fn met(dependency: impl Into<String>) -> Self {
        Self {
            dependency: dependency.into(),
            unmet: BTreeSet::new(),
        }
    }

    /// Creates a result with every item unmet
    pub fn unmet_all(dependency: impl Into<String>) -> Self {
        Self {
            dependency: dependency.into(),
            unmet: ChecklistItem::all().iter().copied().collect(),
        }
    }

    /// Marks an item as unmet
    pub fn mark_unmet(&mut self, item: ChecklistItem) {
        self.unmet.insert(item);
    }

    /// Returns true if the item is met
    pub fn is_met(&self, item: ChecklistItem) -> bool {
        !self.unmet.contains(&item)
    }

    /// Returns true if every checklist item is met
    pub fn passed(&self) -> bool {
        self.unmet.is_empty()
    }

    /// Returns the unmet items in report order
    pub fn unmet_items(&self) -> impl Iterator<Item = ChecklistItem> + '_ {
        self.unmet.iter().copied()
    }
}

/// Overall checklist outcome across all dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// One result per dependency, in extraction order
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    /// Creates an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dependency result
    pub fn add_result(&mut self, result: ValidationResult) {
        self.results.push(result);
    }

    /// Returns true if every dependency passed
    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.passed())
    }

    /// Returns the number of dependencies that passed
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    /// Returns the number of dependencies with unmet items
    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    /// Returns the dependencies with unmet items
    pub fn failures(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    /// Looks up the result for a dependency
    pub fn get(&self, dependency: &str) -> Option<&ValidationResult> {
        let key = super::dependency_key(dependency);
        self.results
            .iter()
            .find(|r| super::dependency_key(&r.dependency) == key)
    }
}
