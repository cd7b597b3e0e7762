//! CurseForge addon API registry implementation

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::version::error::RegistryError;
use crate::version::provider::{ProviderKind, ProviderType};
use crate::version::registries::{check_status, send_logged};
use crate::version::registry::Registry;
use crate::version::types::{Candidate, CurseForgeListing, Listing};

/// Default base URL for the CurseForge addon API
const DEFAULT_BASE_URL: &str = "https://addons-ecs.forgesvc.net";

/// Response from the addon endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Addon {
    #[serde(default)]
    latest_files: Vec<AddonFile>,
}

/// One file entry, shared by the addon and files endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddonFile {
    display_name: String,
    file_name: String,
    download_url: String,
}

impl From<AddonFile> for Candidate {
    fn from(file: AddonFile) -> Self {
        Candidate {
            display_name: file.display_name,
            file_name: file.file_name,
            download_url: file.download_url,
        }
    }
}

/// Registry implementation for the CurseForge addon API
pub struct CurseForgeRegistry {
    client: Client,
    base_url: String,
}

impl CurseForgeRegistry {
    /// Creates a new CurseForgeRegistry with a custom base URL
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a CurseForgeRegistry against the public API
    pub fn with_client(client: Client) -> Self {
        Self::new(client, DEFAULT_BASE_URL)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, subject: &str) -> Result<T, RegistryError> {
        let url = format!("{}{}", self.base_url, path);
        let response = check_status(send_logged(&self.client, self.client.get(&url)).await?, subject)?;

        response.json().await.map_err(|e| {
            warn!("Failed to parse CurseForge response for {}: {}", url, e);
            RegistryError::InvalidResponse(e.to_string())
        })
    }
}

#[async_trait::async_trait]
impl Registry for CurseForgeRegistry {
    fn provider_type(&self) -> ProviderType {
        ProviderType::CurseForge
    }

    async fn fetch_listing(
        &self,
        provider: &ProviderKind,
        _game_version: &str,
    ) -> Result<Listing, RegistryError> {
        let ProviderKind::CurseForge(config) = provider else {
            return Err(RegistryError::ProviderMismatch {
                expected: self.provider_type().as_str(),
                actual: provider.provider_type().as_str(),
            });
        };

        let subject = format!("CurseForge project {}", config.project_id);
        let addon_path = format!("/api/v2/addon/{}", config.project_id);
        let files_path = format!("/api/v2/addon/{}/files", config.project_id);

        let (addon, files) = futures::join!(
            self.get_json::<Addon>(&addon_path, &subject),
            self.get_json::<Vec<AddonFile>>(&files_path, &subject),
        );
        let addon = addon?;

        // The full file list only feeds the fallback tier
        let files = files.unwrap_or_else(|e| {
            warn!("Failed to fetch all files of {}: {}", subject, e);
            Vec::new()
        });

        Ok(Listing::CurseForge(CurseForgeListing {
            latest_files: addon.latest_files.into_iter().map(Candidate::from).collect(),
            all_files: files.into_iter().map(Candidate::from).collect(),
        }))
    }
}
