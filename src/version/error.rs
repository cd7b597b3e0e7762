use thiserror::Error;

use crate::version::semver::ParseFailure;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Registry for {expected} cannot fetch a {actual} provider")]
    ProviderMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Operator errors that abort a single resolution call
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Missing {0} pattern")]
    MissingPattern(&'static str),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Pattern '{pattern}' needs at least {expected} capturing groups")]
    TooFewGroups { pattern: String, expected: usize },

    #[error("Invalid {what} version: {source}")]
    InvalidVersion {
        what: &'static str,
        #[source]
        source: ParseFailure,
    },

    #[error("{provider} provider cannot resolve a {listing} listing")]
    ListingMismatch {
        provider: &'static str,
        listing: &'static str,
    },
}
