//! Game-version constraint filter with an optional fallback tier

use tracing::debug;

use crate::version::error::ResolveError;
use crate::version::extract::{VersionedCandidates, extract, extract_indexed};
use crate::version::semver::SemanticVersion;
use crate::version::types::{Candidate, ExtractionConfig, Field};

/// Keep only the entries whose version equals `required` exactly
pub fn filter_by_version(
    versioned: &VersionedCandidates,
    required: &SemanticVersion,
) -> VersionedCandidates {
    versioned
        .iter()
        .filter(|(_, version)| *version == required)
        .map(|(index, version)| (*index, version.clone()))
        .collect()
}

/// Secondary, broader listing searched when the primary one has no match
#[derive(Debug, Clone)]
pub struct FallbackTier<'a> {
    pub candidates: &'a [Candidate],
    pub config: ExtractionConfig,
    pub default_field: Field,
    /// Case-insensitive substring the selected field must contain
    pub loader: &'a str,
}

/// Which listing the indices of a filter result refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Primary,
    Fallback,
}

/// Narrow `candidates` to those built for `required`.
///
/// When the primary listing yields no match and a fallback tier is given,
/// the fallback listing is restricted to loader-tagged candidates, extracted
/// with its own config, and filtered the same way. The fallback never runs
/// when the primary listing has at least one match.
pub fn filter_with_fallback(
    candidates: &[Candidate],
    config: &ExtractionConfig,
    default_field: Field,
    required: &SemanticVersion,
    fallback: Option<FallbackTier<'_>>,
) -> Result<(Tier, VersionedCandidates), ResolveError> {
    let primary = filter_by_version(&extract(candidates, config, default_field)?, required);
    if !primary.is_empty() {
        return Ok((Tier::Primary, primary));
    }

    let Some(fallback) = fallback else {
        return Ok((Tier::Primary, primary));
    };

    debug!(
        "No candidate matched {} in primary listing, trying {} fallback candidates",
        required,
        fallback.candidates.len()
    );

    let loader = fallback.loader.to_lowercase();
    let field = fallback.config.field.resolve(fallback.default_field);
    let loader_tagged = fallback
        .candidates
        .iter()
        .enumerate()
        .filter(|(_, candidate)| candidate.field(field).to_lowercase().contains(&loader));

    let secondary = extract_indexed(loader_tagged, &fallback.config, fallback.default_field)?;
    Ok((Tier::Fallback, filter_by_version(&secondary, required)))
}
