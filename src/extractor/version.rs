//! Version hint helpers
//!
//! Handles version formats seen in task descriptions and documentation:
//! - Plain: `0.110`, `18.2.0`, `14`
//! - Prefixed: `v18.2`, `version 2.5`
//! - Pre-release suffix: `1.0.0-rc1`

use crate::domain::Dependency;
use regex::Regex;
use std::sync::LazyLock;

/// A version token at the start of a string, optionally prefixed by `v` or `version`
static LEADING_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:[vV]|[vV]ersion[ \t]+)?(\d+(?:\.\d+)*(?:-[0-9A-Za-z]+(?:\.[0-9A-Za-z]+)*)?)")
        .unwrap()
});

/// A "version X.Y" phrase anywhere in free text
static VERSION_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bversion\s*:?\s*v?(\d+\.\d+(?:\.\d+)*)").unwrap()
});

/// Parse a version token at the start of `rest`
///
/// The token must end at a word boundary, so `14px` or `3rd` are rejected.
pub fn leading_version(rest: &str) -> Option<String> {
    let caps = LEADING_VERSION_RE.captures(rest)?;
    let whole = caps.get(0)?;
    let version = caps.get(1)?.as_str();

    let next = rest[whole.end()..].chars().next();
    if next.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    Some(version.to_string())
}

/// Number of numeric components in a version hint (`0.110.2` -> 3)
pub fn specificity(version: &str) -> usize {
    let core = version.split(['-', '+']).next().unwrap_or(version);
    core.split('.')
        .filter(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
        .count()
}

/// Returns true if `candidate` is a more specific hint than `current`
///
/// Any hint beats no hint; ties keep the current hint.
pub fn is_more_specific(current: Option<&str>, candidate: Option<&str>) -> bool {
    match (current, candidate) {
        (_, None) => false,
        (None, Some(_)) => true,
        (Some(current), Some(candidate)) => specificity(candidate) > specificity(current),
    }
}

/// Find the version a piece of content applies to
///
/// Checks, in order: the dependency's own target version, a version written
/// right after the dependency name, and a generic "version X.Y" phrase.
pub fn version_mentioned_in(content: &str, dependency: &Dependency) -> Option<String> {
    if let Some(hint) = dependency.version.as_deref() {
        if mentions_version(content, hint) {
            return Some(hint.to_string());
        }
    }

    let name_pattern = format!(
        r"(?i){}[ \t@]*(?:v|version[ \t]*)?(\d+\.\d+(?:\.\d+)*)",
        regex::escape(&dependency.name)
    );
    if let Ok(name_re) = Regex::new(&name_pattern) {
        if let Some(caps) = name_re.captures(content) {
            return caps.get(1).map(|m| m.as_str().to_string());
        }
    }

    VERSION_PHRASE_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Returns true if `content` contains `version` as a standalone token
fn mentions_version(content: &str, version: &str) -> bool {
    let pattern = format!(r"(?:^|[^0-9.])v?{}(?:$|[^0-9])", regex::escape(version));
    Regex::new(&pattern)
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}
