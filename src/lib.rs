//! groundwork - research-before-you-code library
//!
//! This library turns a free-text coding task into a validated, cited body
//! of research:
//! - Dependency extraction from the task text
//! - Research through web search, URL fetch and structured documentation
//! - An append-only finding store
//! - Checklist validation and report rendering

pub mod capability;
pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod store;
pub mod validator;
