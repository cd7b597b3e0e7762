//! Common types shared by registries and resolution strategies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One remote release file that could become the installed artifact.
///
/// Produced by the registries and consumed read-only by the strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Human readable title (CurseForge `displayName`, GitHub asset name)
    pub display_name: String,
    /// Name of the file as it will be stored on disk
    pub file_name: String,
    /// URL the artifact can be downloaded from
    pub download_url: String,
}

impl Candidate {
    pub fn new(display_name: &str, file_name: &str, download_url: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            file_name: file_name.to_string(),
            download_url: download_url.to_string(),
        }
    }

    /// Candidate for a bare download URL, named after its last path segment
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let raw_name = path.rsplit('/').next().unwrap_or(path);
        let file_name = urlencoding::decode(raw_name)
            .map(|name| name.into_owned())
            .unwrap_or_else(|_| raw_name.to_string());
        Self {
            display_name: file_name.clone(),
            file_name,
            download_url: url.to_string(),
        }
    }

    /// Returns the text of the given field
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::FileName => &self.file_name,
            Field::DisplayName => &self.display_name,
        }
    }
}

/// A concrete candidate text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FileName,
    DisplayName,
}

/// Field selector as written in provider configuration.
///
/// Anything that is not a known field name selects the provider's default
/// field instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSelector {
    FileName,
    DisplayName,
    ProviderDefault,
}

impl FieldSelector {
    /// Resolve the selector against the provider's default field
    pub fn resolve(self, default: Field) -> Field {
        match self {
            FieldSelector::FileName => Field::FileName,
            FieldSelector::DisplayName => Field::DisplayName,
            FieldSelector::ProviderDefault => default,
        }
    }
}

impl From<&str> for FieldSelector {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "filename" => FieldSelector::FileName,
            "displayname" => FieldSelector::DisplayName,
            _ => FieldSelector::ProviderDefault,
        }
    }
}

/// Pattern plus field selector used to recover a version token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    pub pattern: String,
    pub field: FieldSelector,
}

impl ExtractionConfig {
    pub fn new(pattern: &str, field: FieldSelector) -> Self {
        Self {
            pattern: pattern.to_string(),
            field,
        }
    }
}

/// Result of resolving one provider listing against the installed version.
///
/// `resolved_version` and `chosen` are both `None` when nothing survived
/// extraction and filtering. In that case `is_up_to_date` only reflects the
/// comparison against `0` and must not be trusted on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub is_up_to_date: bool,
    pub resolved_version: Option<String>,
    pub chosen: Option<Candidate>,
}

impl Decision {
    /// Decision for a listing where nothing matched
    pub fn nothing_found(is_up_to_date: bool) -> Self {
        Self {
            is_up_to_date,
            resolved_version: None,
            chosen: None,
        }
    }

    /// Classify the decision the way it is reported to the user
    pub fn outcome(&self) -> Outcome {
        if self.resolved_version.is_none() {
            Outcome::NoMatch
        } else if self.is_up_to_date {
            Outcome::UpToDate
        } else if self.chosen.is_none() {
            Outcome::NoMatch
        } else {
            Outcome::UpdateAvailable
        }
    }
}

/// User-visible result of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The provider had no matching release (or no downloadable file)
    NoMatch,
    /// The installed version is current
    UpToDate,
    /// A newer release was chosen for download
    UpdateAvailable,
}

/// A GitHub release together with its downloadable assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    pub published_at: Option<DateTime<Utc>>,
    pub assets: Vec<Candidate>,
}

/// Files of a CurseForge project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CurseForgeListing {
    /// The addon's `latestFiles`, the precise primary listing
    pub latest_files: Vec<Candidate>,
    /// Every file of the project, used only by the fallback tier
    pub all_files: Vec<Candidate>,
}

/// Raw listing fetched from one provider, ready for resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Listing {
    /// Most recently published release, `None` if the repository has none
    GitHub(Option<GitHubRelease>),
    CurseForge(CurseForgeListing),
    /// Raw HTML returned by the mirror
    Masady(String),
}

impl Listing {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Listing::GitHub(_) => "github",
            Listing::CurseForge(_) => "curseforge",
            Listing::Masady(_) => "masadyfi",
        }
    }
}
