//! Core domain models for groundwork
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependencies extracted from a task description
//! - Findings and coverage gaps recorded during research
//! - Checklist validation results

mod dependency;
mod finding;
mod validation;

pub use dependency::{dependency_key, Dependency};
pub use finding::{Capability, CoverageGap, Finding};
pub use validation::{ChecklistItem, ValidationReport, ValidationResult};
