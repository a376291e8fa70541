//! Dependency information structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// An external dependency a task relies on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Display name (e.g., "FastAPI", "Next.js")
    pub name: String,
    /// Target version hint taken from the task, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Why the task needs this dependency (the sentence that mentions it)
    pub rationale: String,
}

impl Dependency {
    /// Creates a new dependency without a version hint
    pub fn new(name: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            rationale: rationale.into(),
        }
    }

    /// Sets the target version (builder pattern)
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.version = if version.trim().is_empty() {
            None
        } else {
            Some(version)
        };
        self
    }

    /// Returns the store key for this dependency
    pub fn key(&self) -> String {
        dependency_key(&self.name)
    }

    /// Returns the version hint or an empty string
    pub fn version_str(&self) -> &str {
        self.version.as_deref().unwrap_or("")
    }
}

/// Normalises a dependency name into a lookup key
pub fn dependency_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_new() {
        let dep = Dependency::new("FastAPI", "Build the API with FastAPI.");
        assert_eq!(dep.name, "FastAPI");
        assert!(dep.version.is_none());
        assert_eq!(dep.rationale, "Build the API with FastAPI.");
    }

    #[test]
    fn test_with_version() {
        let dep = Dependency::new("FastAPI", "").with_version("0.110");
        assert_eq!(dep.version.as_deref(), Some("0.110"));
        assert_eq!(dep.version_str(), "0.110");
    }

    #[test]
    fn test_with_blank_version_is_none() {
        let dep = Dependency::new("FastAPI", "").with_version("  ");
        assert!(dep.version.is_none());
        assert_eq!(dep.version_str(), "");
    }

    #[test]
    fn test_key_is_case_insensitive() {
        let a = Dependency::new("FastAPI", "");
        let b = Dependency::new("fastapi", "");
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key(), "fastapi");
    }

    #[test]
    fn test_display() {
        let dep = Dependency::new("React", "").with_version("18.2");
        assert_eq!(format!("{}", dep), "React@18.2");
        let dep = Dependency::new("React", "");
        assert_eq!(format!("{}", dep), "React");
    }

    #[test]
    fn test_serde_dependency() {
        let dep = Dependency::new("pydantic", "Validate input with pydantic.").with_version("2.5");
        let json = serde_json::to_string(&dep).unwrap();
        let parsed: Dependency = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dep);
    }

    #[test]
    fn test_serde_skips_missing_version() {
        let dep = Dependency::new("tokio", "");
        let json = serde_json::to_string(&dep).unwrap();
        assert!(!json.contains("version"));
    }
}
