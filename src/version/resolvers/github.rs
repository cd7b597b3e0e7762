//! GitHub release resolution

use tracing::debug;

use crate::version::error::ResolveError;
use crate::version::extract::compile_pattern;
use crate::version::provider::GitHubProvider;
use crate::version::resolvers::{Pipeline, decide, installed_version};
use crate::version::types::{Candidate, Decision, ExtractionConfig, Field, FieldSelector, GitHubRelease};

/// Resolve the latest release of a GitHub repository.
///
/// Only assets whose name matches `AssetRegex` are considered. With
/// `UseReleaseTagAsVersion` the tag is compared to the installed version as
/// a plain string and the first matching asset is chosen; otherwise both
/// version patterns are applied to the asset names.
pub fn resolve(
    provider: &GitHubProvider,
    release: Option<&GitHubRelease>,
    current_version: &str,
    game_version: &str,
) -> Result<Decision, ResolveError> {
    let asset_regex = compile_pattern(&provider.asset_regex, "asset")?;

    let Some(release) = release else {
        debug!(
            "{}/{} has no releases",
            provider.author, provider.repository
        );
        if provider.use_release_tag_as_version {
            return Ok(Decision::nothing_found(true));
        }
        return Ok(decide(&installed_version(current_version)?, &[], None));
    };

    let assets: Vec<Candidate> = release
        .assets
        .iter()
        .filter(|asset| asset_regex.is_match(&asset.file_name))
        .cloned()
        .collect();

    if provider.use_release_tag_as_version {
        return Ok(Decision {
            is_up_to_date: release.tag_name == current_version,
            resolved_version: Some(release.tag_name.clone()),
            chosen: assets.into_iter().next(),
        });
    }

    Pipeline {
        candidates: &assets,
        game_version: ExtractionConfig::new(&provider.minecraft_version_regex, FieldSelector::FileName),
        mod_version: ExtractionConfig::new(&provider.mod_version_regex, FieldSelector::FileName),
        default_field: Field::FileName,
        fallback: None,
    }
    .run(current_version, game_version)
}
