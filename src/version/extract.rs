//! Regex-driven recovery of version tokens from candidate text fields

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::version::error::ResolveError;
use crate::version::semver::SemanticVersion;
use crate::version::types::{Candidate, ExtractionConfig, Field};

/// Parsed versions keyed by the candidate's index in its source listing.
///
/// Iteration order is the order candidates were extracted in, which the
/// resolver relies on for its first-seen tie-break.
pub type VersionedCandidates = IndexMap<usize, SemanticVersion>;

/// Compile a configured pattern, failing loudly on empty or invalid input
pub fn compile_pattern(pattern: &str, purpose: &'static str) -> Result<Regex, ResolveError> {
    if pattern.trim().is_empty() {
        return Err(ResolveError::MissingPattern(purpose));
    }
    Regex::new(pattern).map_err(|source| ResolveError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Extract a version from every candidate in a listing.
///
/// See [`extract_indexed`] for the matching rules.
pub fn extract(
    candidates: &[Candidate],
    config: &ExtractionConfig,
    default_field: Field,
) -> Result<VersionedCandidates, ResolveError> {
    extract_indexed(candidates.iter().enumerate(), config, default_field)
}

/// Extract versions from `(index, candidate)` pairs.
///
/// For each candidate the field named by `config.field` is searched (not
/// full-matched) with `config.pattern`. The text of the **last** capturing
/// group is the version token, so a pattern may carry leading context such
/// as a loader tag as long as the version group comes last. A pattern with no
/// groups uses the whole match.
///
/// Candidates are skipped, never reported as errors, when the pattern does
/// not match, the last group is empty or did not participate, or the token is
/// not a valid version. Only an unusable pattern is an error.
pub fn extract_indexed<'a, I>(
    candidates: I,
    config: &ExtractionConfig,
    default_field: Field,
) -> Result<VersionedCandidates, ResolveError>
where
    I: IntoIterator<Item = (usize, &'a Candidate)>,
{
    let regex = compile_pattern(&config.pattern, "extraction")?;
    let field = config.field.resolve(default_field);

    let mut versioned = VersionedCandidates::new();
    for (index, candidate) in candidates {
        let text = candidate.field(field);

        let Some(token) = last_group(&regex, text) else {
            debug!("Pattern '{}' did not match '{}'", config.pattern, text);
            continue;
        };

        match SemanticVersion::parse(token) {
            Ok(version) => {
                versioned.insert(index, version);
            }
            Err(e) => debug!("Skipping '{}': {}", text, e),
        }
    }

    Ok(versioned)
}

/// Text of the last capturing group of the first match, if non-empty
pub(crate) fn last_group<'t>(regex: &Regex, text: &'t str) -> Option<&'t str> {
    let captures = regex.captures(text)?;
    captures
        .get(captures.len() - 1)
        .map(|m| m.as_str())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::types::FieldSelector;
    use rstest::rstest;

    fn jar(name: &str) -> Candidate {
        Candidate::new(name, name, &format!("https://example.com/{}", name))
    }

    fn versions(result: &VersionedCandidates) -> Vec<(usize, String)> {
        result.iter().map(|(i, v)| (*i, v.to_string())).collect()
    }

    #[test]
    fn extract_uses_last_capturing_group() {
        let candidates = vec![jar("Mod-fabric-1.19.2-2.0.0.jar")];
        let config = ExtractionConfig::new(r"(fabric)-[\d.]+-([\d.]+)\.jar", FieldSelector::FileName);

        let result = extract(&candidates, &config, Field::FileName).unwrap();

        assert_eq!(versions(&result), vec![(0, "2.0.0".to_string())]);
    }

    #[test]
    fn extract_searches_instead_of_full_matching() {
        let candidates = vec![jar("prefix Mod-1.18.2 suffix")];
        let config = ExtractionConfig::new(r"Mod-(\d+\.\d+\.\d+)", FieldSelector::FileName);

        let result = extract(&candidates, &config, Field::FileName).unwrap();

        assert_eq!(versions(&result), vec![(0, "1.18.2".to_string())]);
    }

    #[test]
    fn extract_without_groups_uses_whole_match() {
        let candidates = vec![jar("mod-1.2.3.jar")];
        let config = ExtractionConfig::new(r"\d+\.\d+\.\d+", FieldSelector::FileName);

        let result = extract(&candidates, &config, Field::FileName).unwrap();

        assert_eq!(versions(&result), vec![(0, "1.2.3".to_string())]);
    }

    #[rstest]
    #[case::no_match("readme.txt")]
    #[case::unparsable_token("Mod-1.2.3.4.jar")]
    #[case::empty_group("Mod-.jar")]
    fn extract_skips_candidate(#[case] name: &str) {
        let candidates = vec![jar(name), jar("Mod-1.0.0.jar")];
        let config = ExtractionConfig::new(r"Mod-([\d.]*)\.jar", FieldSelector::FileName);

        let result = extract(&candidates, &config, Field::FileName).unwrap();

        assert_eq!(versions(&result), vec![(1, "1.0.0".to_string())]);
    }

    #[test]
    fn extract_skips_group_that_did_not_participate() {
        let candidates = vec![jar("Mod-beta.jar")];
        let config = ExtractionConfig::new(r"Mod-(?:beta|(\d+\.\d+\.\d+))", FieldSelector::FileName);

        let result = extract(&candidates, &config, Field::FileName).unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn extract_keeps_identical_candidates_as_distinct_entries() {
        let candidates = vec![jar("Mod-1.0.0.jar"), jar("Mod-1.0.0.jar")];
        let config = ExtractionConfig::new(r"Mod-([\d.]+)\.jar", FieldSelector::FileName);

        let result = extract(&candidates, &config, Field::FileName).unwrap();

        assert_eq!(result.len(), 2);
    }

    #[test]
    fn extract_reads_selected_field() {
        let candidates = vec![Candidate::new(
            "Mod 3.1.0 for 1.19.2",
            "mod.jar",
            "https://example.com/mod.jar",
        )];
        let config = ExtractionConfig::new(r"Mod (\d+\.\d+\.\d+)", FieldSelector::DisplayName);

        let by_display = extract(&candidates, &config, Field::FileName).unwrap();
        assert_eq!(versions(&by_display), vec![(0, "3.1.0".to_string())]);

        let default_config = ExtractionConfig::new(r"Mod (\d+\.\d+\.\d+)", FieldSelector::ProviderDefault);
        let by_default = extract(&candidates, &default_config, Field::FileName).unwrap();
        assert!(by_default.is_empty());
    }

    #[test]
    fn extract_returns_empty_for_empty_input() {
        let config = ExtractionConfig::new(r"(\d+)", FieldSelector::FileName);
        assert!(extract(&[], &config, Field::FileName).unwrap().is_empty());
    }

    #[test]
    fn extract_fails_loudly_on_invalid_pattern() {
        let config = ExtractionConfig::new(r"Mod-((\d+)", FieldSelector::FileName);
        let result = extract(&[jar("Mod-1.jar")], &config, Field::FileName);
        assert!(matches!(result, Err(ResolveError::InvalidPattern { .. })));
    }

    #[test]
    fn extract_fails_loudly_on_missing_pattern() {
        let config = ExtractionConfig::new("  ", FieldSelector::FileName);
        let result = extract(&[jar("Mod-1.jar")], &config, Field::FileName);
        assert!(matches!(result, Err(ResolveError::MissingPattern(_))));
    }
}
