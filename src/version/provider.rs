//! Provider configuration as persisted in the settings file
//!
//! Each entry carries a `Type` discriminator, a `Key` referenced by installed
//! mods, and a provider-specific `Data` object:
//!
//! ```json
//! { "Type": "Github", "Key": "sodium", "Data": { "Author": "...", ... } }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_LOADER_NAME;

/// Kind of remote release source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderType {
    /// GitHub releases (tag-based)
    GitHub,
    /// CurseForge-style addon API (asset-regex based)
    CurseForge,
    /// masa.dy.fi mod mirror (HTML-scraped)
    Masady,
}

impl ProviderType {
    /// Returns the string representation of the provider type
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::GitHub => "github",
            ProviderType::CurseForge => "curseforge",
            ProviderType::Masady => "masadyfi",
        }
    }
}

impl std::str::FromStr for ProviderType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Ok(ProviderType::GitHub),
            "curseforge" => Ok(ProviderType::CurseForge),
            "masadyfi" => Ok(ProviderType::Masady),
            _ => Err(()),
        }
    }
}

/// A configured provider entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(flatten)]
    pub kind: ProviderKind,
}

/// Provider-specific configuration, tagged by `Type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Data")]
pub enum ProviderKind {
    #[serde(rename = "Github", alias = "github", alias = "GitHub", alias = "GITHUB")]
    GitHub(GitHubProvider),
    #[serde(
        rename = "CurseForge",
        alias = "curseforge",
        alias = "Curseforge",
        alias = "CURSEFORGE"
    )]
    CurseForge(CurseForgeProvider),
    #[serde(
        rename = "Masadyfi",
        alias = "masadyfi",
        alias = "MasadyFi",
        alias = "MASADYFI"
    )]
    Masady(MasadyProvider),
}

impl ProviderKind {
    pub fn provider_type(&self) -> ProviderType {
        match self {
            ProviderKind::GitHub(_) => ProviderType::GitHub,
            ProviderKind::CurseForge(_) => ProviderType::CurseForge,
            ProviderKind::Masady(_) => ProviderType::Masady,
        }
    }

    /// Key identifying the remote listing this provider fetches.
    ///
    /// GitHub and CurseForge listings do not depend on the game version;
    /// the mirror is queried per game version.
    pub fn listing_key(&self, game_version: &str) -> String {
        match self {
            ProviderKind::GitHub(p) => format!("{}/{}", p.author, p.repository),
            ProviderKind::CurseForge(p) => p.project_id.to_string(),
            ProviderKind::Masady(p) => format!("{}@{}", p.mod_name, game_version),
        }
    }
}

/// GitHub releases provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GitHubProvider {
    pub author: String,
    pub repository: String,
    /// Selects the release assets that are candidates at all
    pub asset_regex: String,
    #[serde(default)]
    pub minecraft_version_regex: String,
    #[serde(default)]
    pub mod_version_regex: String,
    /// Compare the release tag as an opaque string instead of parsing assets
    #[serde(default)]
    pub use_release_tag_as_version: bool,
}

/// CurseForge-style addon provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurseForgeProvider {
    pub project_id: i64,
    pub minecraft_version_regex: String,
    pub mod_version_regex: String,
    /// Field the game-version pattern is applied to
    #[serde(default)]
    pub extract_from_field: String,
    /// Field the mod-version pattern is applied to, `ExtractFromField` if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mod_version_extract_from_field: Option<String>,
    /// Field used by the fallback tier over all project files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_extract_from_field: Option<String>,
    /// Loader name fallback candidates must mention
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader_name: Option<String>,
}

impl CurseForgeProvider {
    pub fn mod_version_field(&self) -> &str {
        self.mod_version_extract_from_field
            .as_deref()
            .unwrap_or(&self.extract_from_field)
    }

    pub fn fallback_field(&self) -> &str {
        self.fallback_extract_from_field
            .as_deref()
            .unwrap_or("displayname")
    }

    pub fn loader(&self) -> &str {
        self.loader_name.as_deref().unwrap_or(DEFAULT_LOADER_NAME)
    }
}

/// HTML mirror provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MasadyProvider {
    pub mod_name: String,
    /// Pattern with the version in group 1 and the download URL in the last group
    pub html_extractor_regex: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn deserializes_github_provider() {
        let provider: Provider = serde_json::from_value(json!({
            "Type": "Github",
            "Key": "sodium",
            "Data": {
                "Author": "CaffeineMC",
                "Repository": "sodium-fabric",
                "AssetRegex": "sodium-fabric-.*\\.jar$",
                "MinecraftVersionRegex": "mc(\\d+\\.\\d+(\\.\\d+)?)",
                "ModVersionRegex": "-(\\d+\\.\\d+\\.\\d+)\\+",
                "UseReleaseTagAsVersion": false
            }
        }))
        .unwrap();

        assert_eq!(provider.key, "sodium");
        assert_eq!(provider.kind.provider_type(), ProviderType::GitHub);
        assert_eq!(provider.kind.listing_key("1.19.2"), "CaffeineMC/sodium-fabric");
    }

    #[rstest]
    #[case("CurseForge")]
    #[case("curseforge")]
    fn deserializes_curseforge_provider_case_insensitively(#[case] type_name: &str) {
        let provider: Provider = serde_json::from_value(json!({
            "Type": type_name,
            "Key": "modmenu",
            "Data": {
                "ProjectId": 308702,
                "MinecraftVersionRegex": "(\\d+\\.\\d+\\.\\d+)",
                "ModVersionRegex": "(\\d+\\.\\d+\\.\\d+)$",
                "ExtractFromField": "displayname"
            }
        }))
        .unwrap();

        let ProviderKind::CurseForge(curse) = provider.kind else {
            panic!("expected CurseForge provider");
        };
        assert_eq!(curse.project_id, 308702);
        assert_eq!(curse.mod_version_field(), "displayname");
        assert_eq!(curse.fallback_field(), "displayname");
        assert_eq!(curse.loader(), DEFAULT_LOADER_NAME);
    }

    #[test]
    fn deserializes_masady_provider() {
        let provider: Provider = serde_json::from_value(json!({
            "Type": "Masadyfi",
            "Key": "minihud",
            "Data": {
                "ModName": "minihud",
                "HtmlExtractorRegex": "minihud-fabric-[\\d.]+-([\\d.]+)\\.jar\">(.*?)<"
            }
        }))
        .unwrap();

        assert_eq!(provider.kind.provider_type(), ProviderType::Masady);
        assert_eq!(provider.kind.listing_key("1.19.2"), "minihud@1.19.2");
    }

    #[test]
    fn rejects_unknown_provider_type() {
        let result = serde_json::from_value::<Provider>(json!({
            "Type": "Modrinth",
            "Key": "x",
            "Data": {}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn serializes_with_type_key_and_data() {
        let provider = Provider {
            key: "minihud".to_string(),
            kind: ProviderKind::Masady(MasadyProvider {
                mod_name: "minihud".to_string(),
                html_extractor_regex: "(.*)".to_string(),
            }),
        };

        let value = serde_json::to_value(&provider).unwrap();

        assert_eq!(
            value,
            json!({
                "Key": "minihud",
                "Type": "Masadyfi",
                "Data": { "ModName": "minihud", "HtmlExtractorRegex": "(.*)" }
            })
        );
    }

    #[rstest]
    #[case("github", Some(ProviderType::GitHub))]
    #[case("CurseForge", Some(ProviderType::CurseForge))]
    #[case("masadyfi", Some(ProviderType::Masady))]
    #[case("modrinth", None)]
    fn provider_type_from_str(#[case] input: &str, #[case] expected: Option<ProviderType>) {
        assert_eq!(input.parse::<ProviderType>().ok(), expected);
    }
}
