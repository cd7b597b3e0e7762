//! masa.dy.fi mirror resolution
//!
//! The mirror has no API; its listing page is filtered server-side by game
//! version, so the only work left is scraping version/link pairs out of the
//! HTML and picking the highest version.

use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use crate::version::error::ResolveError;
use crate::version::extract::{VersionedCandidates, compile_pattern};
use crate::version::provider::MasadyProvider;
use crate::version::resolver::resolve_latest;
use crate::version::resolvers::{decide, installed_version};
use crate::version::semver::SemanticVersion;
use crate::version::types::{Candidate, Decision};

/// Resolve the newest mod build listed in the mirror's HTML
pub fn resolve(
    provider: &MasadyProvider,
    html: &str,
    current_version: &str,
) -> Result<Decision, ResolveError> {
    let current = installed_version(current_version)?;
    let regex = compile_pattern(&provider.html_extractor_regex, "HTML extractor")?;
    if regex.captures_len() < 3 {
        return Err(ResolveError::TooFewGroups {
            pattern: provider.html_extractor_regex.clone(),
            expected: 2,
        });
    }

    let (candidates, versioned) = scrape(&regex, html);
    debug!(
        "Scraped {} builds of {} from mirror",
        candidates.len(),
        provider.mod_name
    );

    Ok(decide(&current, &candidates, resolve_latest(&versioned)))
}

/// Match the pattern repeatedly over the whole page.
///
/// Group 1 holds the version, the last group the download link. A link seen
/// twice keeps its first row.
fn scrape(regex: &Regex, html: &str) -> (Vec<Candidate>, VersionedCandidates) {
    let mut candidates = Vec::new();
    let mut versioned = VersionedCandidates::new();
    let mut seen = HashSet::new();

    for captures in regex.captures_iter(html) {
        let link = captures
            .get(captures.len() - 1)
            .map(|m| m.as_str())
            .filter(|link| !link.is_empty());
        let token = captures.get(1).map(|m| m.as_str());
        let (Some(link), Some(token)) = (link, token) else {
            continue;
        };

        if seen.contains(link) {
            continue;
        }

        match SemanticVersion::parse(token) {
            Ok(version) => {
                seen.insert(link);
                versioned.insert(candidates.len(), version);
                candidates.push(Candidate::from_url(link));
            }
            Err(e) => debug!("Skipping mirror row '{}': {}", link, e),
        }
    }

    (candidates, versioned)
}
