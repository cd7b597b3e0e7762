//! Provider-specific resolution strategies
//!
//! Every strategy turns one fetched [`Listing`] into a [`Decision`]:
//!
//! ```text
//! Init → ExtractGameVersion → FilterByGameVersion → [FallbackExtract → FallbackFilter]
//!      → ExtractModVersion → SelectBest → Done
//! ```
//!
//! - [`github`]: tag-based, optionally compares the release tag verbatim
//! - [`curseforge`]: asset-regex based, with a fallback tier over all files
//! - [`masady`]: scrapes name/version pairs out of raw HTML

pub mod curseforge;
pub mod github;
pub mod masady;

use tracing::debug;

use crate::version::error::ResolveError;
use crate::version::extract::extract_indexed;
use crate::version::filter::{FallbackTier, Tier, filter_with_fallback};
use crate::version::provider::ProviderKind;
use crate::version::resolver::resolve_latest;
use crate::version::semver::SemanticVersion;
use crate::version::types::{Candidate, Decision, ExtractionConfig, Field, Listing};

/// Resolve a fetched listing for the given provider.
///
/// `current_version` is the installed mod version (blank means nothing is
/// installed yet) and `game_version` the Minecraft version the mod must
/// target.
pub fn resolve(
    provider: &ProviderKind,
    listing: &Listing,
    current_version: &str,
    game_version: &str,
) -> Result<Decision, ResolveError> {
    match (provider, listing) {
        (ProviderKind::GitHub(config), Listing::GitHub(release)) => {
            github::resolve(config, release.as_ref(), current_version, game_version)
        }
        (ProviderKind::CurseForge(config), Listing::CurseForge(files)) => {
            curseforge::resolve(config, files, current_version, game_version)
        }
        (ProviderKind::Masady(config), Listing::Masady(html)) => {
            masady::resolve(config, html, current_version)
        }
        _ => Err(ResolveError::ListingMismatch {
            provider: provider.provider_type().as_str(),
            listing: listing.kind_name(),
        }),
    }
}

/// Parse the installed version, treating a blank one as `0`
pub(crate) fn installed_version(current_version: &str) -> Result<SemanticVersion, ResolveError> {
    if current_version.trim().is_empty() {
        return Ok(SemanticVersion::zero());
    }
    SemanticVersion::parse(current_version).map_err(|source| ResolveError::InvalidVersion {
        what: "installed",
        source,
    })
}

/// Build the decision for the best candidate, if any
pub(crate) fn decide(
    current: &SemanticVersion,
    candidates: &[Candidate],
    best: Option<(usize, &SemanticVersion)>,
) -> Decision {
    match best {
        None => Decision::nothing_found(*current >= SemanticVersion::zero()),
        Some((index, version)) => Decision {
            is_up_to_date: current >= version,
            resolved_version: Some(version.to_string()),
            chosen: candidates.get(index).cloned(),
        },
    }
}

/// The shared extract → filter → extract → select pipeline
pub(crate) struct Pipeline<'a> {
    pub candidates: &'a [Candidate],
    pub game_version: ExtractionConfig,
    pub mod_version: ExtractionConfig,
    pub default_field: Field,
    pub fallback: Option<FallbackTier<'a>>,
}

impl Pipeline<'_> {
    pub fn run(self, current_version: &str, game_version: &str) -> Result<Decision, ResolveError> {
        let current = installed_version(current_version)?;
        let required =
            SemanticVersion::parse(game_version).map_err(|source| ResolveError::InvalidVersion {
                what: "game",
                source,
            })?;

        let fallback_candidates = self.fallback.as_ref().map(|tier| tier.candidates);
        let (tier, matching) = filter_with_fallback(
            self.candidates,
            &self.game_version,
            self.default_field,
            &required,
            self.fallback,
        )?;

        let listing = match (tier, fallback_candidates) {
            (Tier::Fallback, Some(candidates)) => candidates,
            _ => self.candidates,
        };
        debug!(
            "{} candidates target game version {} ({:?} tier)",
            matching.len(),
            required,
            tier
        );

        let with_mod_version = extract_indexed(
            matching.keys().map(|&index| (index, &listing[index])),
            &self.mod_version,
            self.default_field,
        )?;

        Ok(decide(
            &current,
            listing,
            resolve_latest(&with_mod_version),
        ))
    }
}
