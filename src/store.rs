//! Finding store
//!
//! Append-only collection of findings and coverage gaps, keyed by dependency.
//! Recording is idempotent on (url, capability) for findings and on
//! (capability, target) for gaps.

use crate::domain::{dependency_key, Capability, CoverageGap, Dependency, Finding};
use crate::error::StoreError;
use std::collections::HashMap;

/// Evidence recorded for one dependency
#[derive(Debug, Clone, Default)]
struct Entry {
    findings: Vec<Finding>,
    gaps: Vec<CoverageGap>,
}

/// Append-only store of findings keyed by dependency name
#[derive(Debug, Clone, Default)]
pub struct FindingStore {
    /// Dependencies of the current extraction set, in extraction order
    dependencies: Vec<Dependency>,
    /// Dependency key -> recorded evidence
    entries: HashMap<String, Entry>,
}

impl FindingStore {
    /// Create a store for an extraction set
    pub fn new(dependencies: Vec<Dependency>) -> Self {
        let entries = dependencies
            .iter()
            .map(|d| (d.key(), Entry::default()))
            .collect();
        Self {
            dependencies,
            entries,
        }
    }

    /// Dependencies of the extraction set, in extraction order
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Look up a dependency by name
    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        let key = dependency_key(name);
        self.dependencies.iter().find(|d| d.key() == key)
    }

    fn entry_mut(&mut self, dependency: &str) -> Result<&mut Entry, StoreError> {
        self.entries
            .get_mut(&dependency_key(dependency))
            .ok_or_else(|| StoreError::UnknownDependency {
                name: dependency.to_string(),
            })
    }

    /// Record a finding
    ///
    /// A finding with the same (url, capability) as a stored one is merged
    /// into it: a missing version is filled in, nothing is appended. Returns
    /// true if the finding was appended.
    pub fn record(&mut self, dependency: &str, finding: Finding) -> Result<bool, StoreError> {
        let entry = self.entry_mut(dependency)?;

        if let Some(existing) = entry.findings.iter_mut().find(|f| f.same_source(&finding)) {
            if !existing.has_version() && finding.has_version() {
                existing.version = finding.version;
            }
            return Ok(false);
        }

        entry.findings.push(finding);
        Ok(true)
    }

    /// Record a coverage gap; duplicates on (capability, target) are dropped
    pub fn record_gap(&mut self, dependency: &str, gap: CoverageGap) -> Result<bool, StoreError> {
        let entry = self.entry_mut(dependency)?;

        if entry.gaps.iter().any(|g| g.same_target(&gap)) {
            return Ok(false);
        }

        entry.gaps.push(gap);
        Ok(true)
    }

    /// Findings for a dependency, in insertion order
    pub fn query(&self, dependency: &str) -> &[Finding] {
        self.entries
            .get(&dependency_key(dependency))
            .map(|e| e.findings.as_slice())
            .unwrap_or(&[])
    }

    /// Coverage gaps for a dependency, in insertion order
    pub fn gaps(&self, dependency: &str) -> &[CoverageGap] {
        self.entries
            .get(&dependency_key(dependency))
            .map(|e| e.gaps.as_slice())
            .unwrap_or(&[])
    }

    /// Findings for a dependency obtained through one capability
    pub fn by_capability<'a>(
        &'a self,
        dependency: &str,
        capability: Capability,
    ) -> impl Iterator<Item = &'a Finding> {
        self.query(dependency)
            .iter()
            .filter(move |f| f.capability == capability)
    }

    /// Total number of findings across all dependencies
    pub fn total_findings(&self) -> usize {
        self.entries.values().map(|e| e.findings.len()).sum()
    }

    /// Total number of coverage gaps across all dependencies
    pub fn total_gaps(&self) -> usize {
        self.entries.values().map(|e| e.gaps.len()).sum()
    }
}
