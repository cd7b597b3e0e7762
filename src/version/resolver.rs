//! Latest version selection over extracted candidates

use crate::version::extract::VersionedCandidates;
use crate::version::semver::SemanticVersion;

/// Select the candidate with the highest version.
///
/// Returns `None` for an empty input, which is the normal "nothing matched"
/// outcome. When several candidates share the highest version the one seen
/// first in iteration order wins; there is no secondary key.
pub fn resolve_latest(versioned: &VersionedCandidates) -> Option<(usize, &SemanticVersion)> {
    versioned
        .iter()
        .fold(None, |best: Option<(usize, &SemanticVersion)>, (index, version)| {
            match best {
                Some((_, best_version)) if version <= best_version => best,
                _ => Some((*index, version)),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn versioned(entries: &[(usize, &str)]) -> VersionedCandidates {
        entries
            .iter()
            .map(|(i, v)| (*i, SemanticVersion::parse(v).unwrap()))
            .collect()
    }

    #[rstest]
    #[case(&[(0, "1.0.0"), (1, "2.0.0"), (2, "1.5.0")], 1, "2.0.0")]
    #[case(&[(5, "1.0.0-rc.1"), (3, "1.0.0")], 3, "1.0.0")]
    #[case(&[(7, "0.1.0")], 7, "0.1.0")]
    fn resolve_latest_returns_maximum(
        #[case] entries: &[(usize, &str)],
        #[case] expected_index: usize,
        #[case] expected_version: &str,
    ) {
        let input = versioned(entries);

        let (index, version) = resolve_latest(&input).unwrap();

        assert_eq!(index, expected_index);
        assert_eq!(version.to_string(), expected_version);
    }

    #[test]
    fn resolve_latest_returns_none_for_empty_input() {
        assert_eq!(resolve_latest(&VersionedCandidates::new()), None);
    }

    #[test]
    fn resolve_latest_keeps_first_seen_on_ties() {
        let input = versioned(&[(4, "0.9.0"), (2, "1.0.0"), (0, "1.0.0+other"), (1, "1.0.0")]);

        for _ in 0..10 {
            let (index, _) = resolve_latest(&input).unwrap();
            assert_eq!(index, 2);
        }
    }
}
