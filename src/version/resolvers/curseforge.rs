//! CurseForge file resolution

use crate::version::error::ResolveError;
use crate::version::filter::FallbackTier;
use crate::version::provider::CurseForgeProvider;
use crate::version::resolvers::Pipeline;
use crate::version::types::{CurseForgeListing, Decision, ExtractionConfig, Field, FieldSelector};

/// Resolve the newest project file for the required game version.
///
/// The addon's latest files are searched first. Some projects omit the
/// exact game version there, so when none of them match, every project file
/// mentioning the configured loader is searched instead.
pub fn resolve(
    provider: &CurseForgeProvider,
    listing: &CurseForgeListing,
    current_version: &str,
    game_version: &str,
) -> Result<Decision, ResolveError> {
    let fallback = FallbackTier {
        candidates: &listing.all_files,
        config: ExtractionConfig::new(
            &provider.minecraft_version_regex,
            FieldSelector::from(provider.fallback_field()),
        ),
        default_field: Field::FileName,
        loader: provider.loader(),
    };

    Pipeline {
        candidates: &listing.latest_files,
        game_version: ExtractionConfig::new(
            &provider.minecraft_version_regex,
            FieldSelector::from(provider.extract_from_field.as_str()),
        ),
        mod_version: ExtractionConfig::new(
            &provider.mod_version_regex,
            FieldSelector::from(provider.mod_version_field()),
        ),
        default_field: Field::FileName,
        fallback: Some(fallback),
    }
    .run(current_version, game_version)
}
