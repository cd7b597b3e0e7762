//! masa.dy.fi mod mirror registry implementation

use reqwest::Client;

use crate::version::error::RegistryError;
use crate::version::provider::{ProviderKind, ProviderType};
use crate::version::registries::{check_status, send_logged};
use crate::version::registry::Registry;
use crate::version::types::Listing;

/// Default base URL for the client mod listing
const DEFAULT_BASE_URL: &str = "https://masa.dy.fi/mcmods/client_mods/";

/// Registry implementation for the masa.dy.fi HTML listing
pub struct MasadyRegistry {
    client: Client,
    base_url: String,
}

impl MasadyRegistry {
    /// Creates a new MasadyRegistry with a custom base URL
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Creates a MasadyRegistry against the public mirror
    pub fn with_client(client: Client) -> Self {
        Self::new(client, DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Registry for MasadyRegistry {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Masady
    }

    async fn fetch_listing(
        &self,
        provider: &ProviderKind,
        game_version: &str,
    ) -> Result<Listing, RegistryError> {
        let ProviderKind::Masady(config) = provider else {
            return Err(RegistryError::ProviderMismatch {
                expected: self.provider_type().as_str(),
                actual: provider.provider_type().as_str(),
            });
        };

        let url = format!(
            "{}?mcver={}&mod={}",
            self.base_url,
            urlencoding::encode(game_version),
            urlencoding::encode(&config.mod_name)
        );
        let request = self.client.get(&url);

        let response = check_status(send_logged(&self.client, request).await?, &config.mod_name)?;
        let html = response.text().await?;

        Ok(Listing::Masady(html))
    }
}
