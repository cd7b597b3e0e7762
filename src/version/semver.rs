//! Semantic version model used for every comparison the updater makes

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::Version;
use thiserror::Error;

/// Version text that does not conform to the semantic-version grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version '{input}': {reason}")]
pub struct ParseFailure {
    pub input: String,
    pub reason: String,
}

/// A parsed, immutable semantic version.
///
/// Equality and ordering follow semver precedence: major, minor, patch, then
/// pre-release (a version without pre-release sorts above one with it).
/// Build metadata is kept for display but never takes part in comparison.
#[derive(Debug, Clone)]
pub struct SemanticVersion(Version);

impl SemanticVersion {
    /// Parse a version string, normalizing partial versions.
    ///
    /// A leading `v` is ignored and partial cores are padded with zeros:
    /// - "v1.2.3" -> 1.2.3
    /// - "1.19" -> 1.19.0
    /// - "0" -> 0.0.0
    /// - "1.2-beta.1" -> 1.2.0-beta.1
    pub fn parse(text: &str) -> Result<Self, ParseFailure> {
        let stripped = text
            .strip_prefix('v')
            .or_else(|| text.strip_prefix('V'))
            .unwrap_or(text);

        let split_at = stripped.find(['-', '+']).unwrap_or(stripped.len());
        let (core, suffix) = stripped.split_at(split_at);
        let normalized = match core.split('.').count() {
            1 => format!("{core}.0.0{suffix}"),
            2 => format!("{core}.0{suffix}"),
            _ => stripped.to_string(),
        };

        Version::parse(&normalized)
            .map(SemanticVersion)
            .map_err(|e| ParseFailure {
                input: text.to_string(),
                reason: e.to_string(),
            })
    }

    /// The `0.0.0` version a missing installation compares as
    pub fn zero() -> Self {
        SemanticVersion(Version::new(0, 0, 0))
    }

    pub fn as_semver(&self) -> &Version {
        &self.0
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = &self.0;
        let b = &other.0;
        a.major
            .cmp(&b.major)
            .then(a.minor.cmp(&b.minor))
            .then(a.patch.cmp(&b.patch))
            .then_with(|| a.pre.cmp(&b.pre))
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SemanticVersion {
    type Err = ParseFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SemanticVersion::parse(s)
    }
}

/// Compare two version strings, returning `None` if either fails to parse
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    let a = SemanticVersion::parse(a).ok()?;
    let b = SemanticVersion::parse(b).ok()?;
    Some(a.cmp(&b))
}
