//! Research checklist validation
//!
//! A pure function over a finding store snapshot. For each dependency:
//! - discovery: at least one finding exists
//! - content-read: at least one finding came from a fetch
//! - version-stated: at least one finding carries a version
//! - citation-present: findings exist and every one has a source URL

use crate::domain::{Capability, ChecklistItem, ValidationReport, ValidationResult};
use crate::store::FindingStore;

/// Validate every dependency of the store's extraction set
pub fn validate(store: &FindingStore) -> ValidationReport {
    let mut report = ValidationReport::new();
    for dependency in store.dependencies() {
        report.add_result(validate_dependency(store, &dependency.name));
    }
    report
}

/// Validate a single dependency
pub fn validate_dependency(store: &FindingStore, dependency: &str) -> ValidationResult {
    let findings = store.query(dependency);

    if findings.is_empty() {
        return ValidationResult::unmet_all(dependency);
    }

    let mut result = ValidationResult::met(dependency);

    if !findings.iter().any(|f| f.capability == Capability::Fetch) {
        result.mark_unmet(ChecklistItem::ContentRead);
    }
    if !findings.iter().any(|f| f.has_version()) {
        result.mark_unmet(ChecklistItem::VersionStated);
    }
    if !findings.iter().all(|f| f.has_citation()) {
        result.mark_unmet(ChecklistItem::CitationPresent);
    }

    result
}
