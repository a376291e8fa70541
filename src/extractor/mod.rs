//! Dependency extraction from free-text task descriptions
//!
//! This module provides:
//! - A catalog of well-known library names and aliases
//! - Version hint parsing and specificity ranking
//! - The extractor that turns a task description into ordered dependencies
//!
//! Recognised mentions:
//! - Catalog names, optionally followed by a version: `FastAPI 0.110`, `Next.js 14`
//! - Package specifiers: `react@18.2`, `pydantic>=2.5`, `httpx==0.27`
//! - Inline code spans naming a catalog entry or shaped like a package:
//!   `` `zod` ``, `` `drizzle-kit` ``, `` `@tanstack/router` ``, `` `socket.io` ``
//!
//! Catalog names that are also English words ("react", "express") only count
//! in prose when capitalised.

mod catalog;
mod version;

pub use catalog::Catalog;
pub use version::{is_more_specific, leading_version, specificity, version_mentioned_in};

use crate::domain::{dependency_key, Dependency};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// `name@1.2`, `name==1.2`, `name>=1.2`, `name~=1.2`, `name^1.2`, `name~1.2`
static SPECIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<name>@?[A-Za-z][A-Za-z0-9_.\-]*(?:/[A-Za-z0-9_.\-]+)?)(?:==|>=|<=|~=|\^|~|@)v?(?P<version>\d+(?:\.\d+)*(?:-[0-9A-Za-z]+)?)",
    )
    .unwrap()
});

/// Inline code span without whitespace
static CODE_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\s]+)`").unwrap());

/// Scoped package: `@scope/name`
static SCOPED_PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@[a-z0-9][a-z0-9._\-]*/[a-z0-9][a-z0-9._\-]*$").unwrap()
});

/// Lowercase name with at least one hyphen or dot: `drizzle-kit`, `socket.io`
static SEPARATED_PACKAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(?:[-.][a-z0-9]+)+$").unwrap());

/// Last segments that make a dotted name a package rather than an attribute path
const DOTTED_PACKAGE_SUFFIXES: &[&str] = &["io"];

/// File extensions that mark a code span as a path rather than a package
const FILE_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "tsx", "jsx", "rs", "go", "json", "toml", "yaml", "yml", "md", "txt",
    "html", "css", "env", "lock", "sh", "sql", "cfg", "ini",
];

/// A single mention of a dependency in the task text
#[derive(Debug, Clone)]
struct Mention {
    /// Byte offset of the mention
    offset: usize,
    /// Display name
    name: String,
    /// Version hint attached to this mention
    version: Option<String>,
}

/// Extracts dependencies from task descriptions
///
/// Extraction is pure and deterministic: identical input always yields an
/// identical sequence, in first-mention order.
pub struct DependencyExtractor {
    catalog: Catalog,
    known_re: Option<Regex>,
}

impl DependencyExtractor {
    /// Create an extractor over the given catalog
    pub fn new(catalog: Catalog) -> Self {
        let aliases = catalog.aliases_longest_first();
        let known_re = if aliases.is_empty() {
            None
        } else {
            let alternation = aliases
                .iter()
                .map(|alias| regex::escape(alias))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                Regex::new(&format!("(?i)(?:{})", alternation))
                    .expect("escaped aliases always form a valid pattern"),
            )
        };

        Self { catalog, known_re }
    }

    /// Create an extractor with the built-in catalog plus extra known names
    pub fn with_known<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Catalog::with_extra(extra))
    }

    /// Extract the ordered, de-duplicated dependencies of a task
    pub fn extract(&self, text: &str) -> Vec<Dependency> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut mentions = Vec::new();
        self.collect_specifiers(text, &mut mentions);
        self.collect_known_names(text, &mut mentions);
        self.collect_code_spans(text, &mut mentions);

        // Stable: specifier mentions stay ahead of name mentions at the same offset
        mentions.sort_by_key(|m| m.offset);

        let mut dependencies: Vec<Dependency> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for mention in mentions {
            let key = dependency_key(&mention.name);
            match index.get(&key) {
                Some(&position) => {
                    let existing = &mut dependencies[position];
                    if is_more_specific(existing.version.as_deref(), mention.version.as_deref()) {
                        existing.version = mention.version;
                    }
                }
                None => {
                    index.insert(key, dependencies.len());
                    let mut dependency =
                        Dependency::new(mention.name, sentence_around(text, mention.offset));
                    dependency.version = mention.version;
                    dependencies.push(dependency);
                }
            }
        }

        dependencies
    }

    /// Resolve a written name to its display name
    fn display_name(&self, written: &str) -> String {
        self.catalog
            .canonical(written)
            .map(str::to_string)
            .unwrap_or_else(|| written.to_string())
    }

    fn collect_specifiers(&self, text: &str, mentions: &mut Vec<Mention>) {
        for caps in SPECIFIER_RE.captures_iter(text) {
            let (Some(name), Some(version)) = (caps.name("name"), caps.name("version")) else {
                continue;
            };

            // Part of a URL path or e-mail address
            if text[..name.start()]
                .chars()
                .next_back()
                .is_some_and(|c| matches!(c, '/' | ':' | '.') || c.is_alphanumeric())
            {
                continue;
            }

            mentions.push(Mention {
                offset: name.start(),
                name: self.display_name(name.as_str()),
                version: Some(version.as_str().to_string()),
            });
        }
    }

    fn collect_known_names(&self, text: &str, mentions: &mut Vec<Mention>) {
        let Some(known_re) = &self.known_re else {
            return;
        };

        for found in known_re.find_iter(text) {
            if !is_standalone(text, found.start(), found.end()) {
                continue;
            }
            if self.catalog.is_word_like(found.as_str())
                && !found.as_str().starts_with(|c: char| c.is_uppercase())
            {
                continue;
            }

            mentions.push(Mention {
                offset: found.start(),
                name: self.display_name(found.as_str()),
                version: leading_version(&text[found.end()..]),
            });
        }
    }

    fn collect_code_spans(&self, text: &str, mentions: &mut Vec<Mention>) {
        for caps in CODE_SPAN_RE.captures_iter(text) {
            let Some(span) = caps.get(1) else {
                continue;
            };
            let content = span.as_str();

            let name = match self.catalog.canonical(content) {
                Some(canonical) => canonical.to_string(),
                None if looks_like_package(content) => content.to_string(),
                None => continue,
            };

            mentions.push(Mention {
                offset: span.start(),
                name,
                version: None,
            });
        }
    }
}

impl Default for DependencyExtractor {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

/// Returns true if the match is a word of its own (not `react-dom` or `react.dev`)
fn is_standalone(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    if before.is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '/' | '@' | '.')) {
        return false;
    }

    let mut rest = text[end..].chars();
    match rest.next() {
        None => true,
        Some(c) if c.is_alphanumeric() || matches!(c, '_' | '-' | '/') => false,
        Some('.') => !rest.next().is_some_and(|c| c.is_alphanumeric()),
        Some(_) => true,
    }
}

/// Returns true if a code span is shaped like a package name
///
/// Plain identifiers (`login`, `None`, `user_id`) are code, not packages.
fn looks_like_package(content: &str) -> bool {
    if SPECIFIER_RE.is_match(content) {
        return false;
    }
    if SCOPED_PACKAGE_RE.is_match(content) {
        return true;
    }
    if !SEPARATED_PACKAGE_RE.is_match(content) {
        return false;
    }

    match content.rsplit_once('.') {
        Some((_, last)) if FILE_EXTENSIONS.contains(&last) => false,
        Some((_, last)) if !content.contains('-') => DOTTED_PACKAGE_SUFFIXES.contains(&last),
        _ => true,
    }
}

/// The trimmed sentence containing `offset`
fn sentence_around(text: &str, offset: usize) -> String {
    let bytes = text.as_bytes();
    let is_space = |b: u8| matches!(b, b' ' | b'\t' | b'\r' | b'\n');
    let is_terminator = |b: u8| matches!(b, b'.' | b'!' | b'?');

    let mut start = 0;
    for i in (0..offset.min(bytes.len())).rev() {
        let ends_sentence =
            is_terminator(bytes[i]) && i + 1 < bytes.len() && is_space(bytes[i + 1]);
        if bytes[i] == b'\n' || ends_sentence {
            start = i + 1;
            break;
        }
    }

    let mut end = bytes.len();
    for i in offset..bytes.len() {
        if bytes[i] == b'\n' {
            end = i;
            break;
        }
        if is_terminator(bytes[i]) && (i + 1 == bytes.len() || is_space(bytes[i + 1])) {
            end = i + 1;
            break;
        }
    }

    text[start..end]
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_start_matches(['-', '*', ' '])
        .to_string()
}
