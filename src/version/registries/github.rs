//! GitHub Releases API registry implementation

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::version::error::RegistryError;
use crate::version::provider::{ProviderKind, ProviderType};
use crate::version::registries::{check_status, send_logged};
use crate::version::registry::Registry;
use crate::version::types::{Candidate, GitHubRelease, Listing};

/// Default base URL for GitHub API
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Response from GitHub Releases API
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    name: String,
    browser_download_url: String,
}

/// Registry implementation for GitHub Releases API
pub struct GitHubRegistry {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubRegistry {
    /// Creates a new GitHubRegistry with a custom base URL
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }

    /// Creates a GitHubRegistry against the public API
    pub fn with_client(client: Client) -> Self {
        Self::new(client, DEFAULT_BASE_URL)
    }
}

/// Pick the most recently published release
fn latest_release(mut releases: Vec<Release>) -> Option<GitHubRelease> {
    // Stable sort: equal timestamps keep API order
    releases.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    releases.into_iter().next().map(|release| GitHubRelease {
        tag_name: release.tag_name,
        published_at: release.published_at,
        assets: release
            .assets
            .into_iter()
            .map(|asset| Candidate::new(&asset.name, &asset.name, &asset.browser_download_url))
            .collect(),
    })
}

#[async_trait::async_trait]
impl Registry for GitHubRegistry {
    fn provider_type(&self) -> ProviderType {
        ProviderType::GitHub
    }

    async fn fetch_listing(
        &self,
        provider: &ProviderKind,
        _game_version: &str,
    ) -> Result<Listing, RegistryError> {
        let ProviderKind::GitHub(config) = provider else {
            return Err(RegistryError::ProviderMismatch {
                expected: self.provider_type().as_str(),
                actual: provider.provider_type().as_str(),
            });
        };

        let repo = format!("{}/{}", config.author, config.repository);
        let url = format!("{}/repos/{}/releases", self.base_url, repo);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = check_status(send_logged(&self.client, request).await?, &repo)?;

        let releases: Vec<Release> = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub releases response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        Ok(Listing::GitHub(latest_release(releases)))
    }
}
