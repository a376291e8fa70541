//! Application error types using thiserror
//!
//! Error hierarchy:
//! - CapabilityError: Failures of the external research capabilities
//! - StoreError: Rejected writes to the finding store
//! - ConfigError: Issues with the config file or CLI values
//! - IoError: Task input and report output failures

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Research capability errors
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// Finding store errors
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors raised by the search, fetch and structured-docs capabilities
///
/// None of these abort a research run. They are logged and recorded as
/// coverage gaps for the dependency being researched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// Search returned an empty result set
    #[error("no results found for '{query}'")]
    NoResultsFound { query: String },

    /// The target could not be reached
    #[error("{target} is unreachable: {message}")]
    Unreachable { target: String, message: String },

    /// The request did not complete in time
    #[error("timeout while requesting {target}")]
    Timeout { target: String },

    /// No library id resolved for a dependency name
    #[error("no documentation library found for '{name}'")]
    NotFound { name: String },

    /// The capability answered with something we could not read
    #[error("invalid response from {target}: {message}")]
    InvalidResponse { target: String, message: String },
}

/// Errors related to the finding store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The dependency is not part of the current extraction set
    #[error("dependency '{name}' is not part of the current extraction set")]
    UnknownDependency { name: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for our schema
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// A value is out of range or malformed
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// No task description was supplied
    #[error("no task description given: pass text, --task-file, or pipe it on stdin")]
    MissingTask,

    /// Failed to read the task description
    #[error("failed to read task from {path}: {source}")]
    TaskRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the report
    #[error("failed to write report to {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CapabilityError {
    /// Creates a new NoResultsFound error
    pub fn no_results(query: impl Into<String>) -> Self {
        CapabilityError::NoResultsFound {
            query: query.into(),
        }
    }

    /// Creates a new Unreachable error
    pub fn unreachable(target: impl Into<String>, message: impl Into<String>) -> Self {
        CapabilityError::Unreachable {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(target: impl Into<String>) -> Self {
        CapabilityError::Timeout {
            target: target.into(),
        }
    }

    /// Creates a new NotFound error
    pub fn not_found(name: impl Into<String>) -> Self {
        CapabilityError::NotFound { name: name.into() }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(target: impl Into<String>, message: impl Into<String>) -> Self {
        CapabilityError::InvalidResponse {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Returns true if a fetch that failed this way is worth one more attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CapabilityError::Unreachable { .. } | CapabilityError::Timeout { .. }
        )
    }
}

impl ConfigError {
    /// Creates a new InvalidValue error
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
