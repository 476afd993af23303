use std::cmp::Ordering;
use std::fmt;

use crate::version::error::ResolveError;

/// Separator between version components
pub const COMPONENT_SEPARATOR: char = '.';

/// A single numeric component of unbounded width.
///
/// Stored as canonical decimal digits (no leading zeros, `"0"` for zero) so
/// ordering is by digit count first, then lexicographic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component(String);

impl Component {
    fn parse(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = digits.trim_start_matches('0');
        let canonical = if trimmed.is_empty() { "0" } else { trimmed };
        Some(Self(canonical.to_string()))
    }
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A dot-separated numeric version such as `3.9.6`.
///
/// The original text is kept so that the chosen version can be used verbatim
/// in URLs and directory names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionString {
    raw: String,
    components: Vec<Component>,
}

impl VersionString {
    pub fn parse(text: &str) -> Result<Self, ResolveError> {
        let components = text
            .split(COMPONENT_SEPARATOR)
            .map(Component::parse)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ResolveError::InvalidVersion(text.to_string()))?;

        Ok(Self {
            raw: text.to_string(),
            components,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Component at `depth`, or `None` when the version is shorter
    pub fn component(&self, depth: usize) -> Option<&Component> {
        self.components.get(depth)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Versions collected from one index page, in scrape order
pub type CandidateSet = Vec<VersionString>;

/// The version a run works with, either pinned by the user or scraped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion(String);

impl ResolvedVersion {
    /// Accepts a user-supplied version.
    ///
    /// The text becomes part of a directory name and a URL path, so it must
    /// be a single path segment.
    pub fn pinned(text: &str) -> Result<Self, ResolveError> {
        let text = text.trim();
        let is_segment = !text.is_empty()
            && text != "."
            && text != ".."
            && !text.contains(['/', '\\', ':']);
        if !is_segment {
            return Err(ResolveError::InvalidVersion(text.to_string()));
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading component, used as the `maven-<major>` path segment
    pub fn major(&self) -> &str {
        self.0
            .split(COMPONENT_SEPARATOR)
            .next()
            .unwrap_or(&self.0)
    }
}

impl From<VersionString> for ResolvedVersion {
    fn from(version: VersionString) -> Self {
        Self(version.raw)
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
