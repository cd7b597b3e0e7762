//! Registry trait for fetching release listings from remote providers

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::provider::{ProviderKind, ProviderType};
use crate::version::types::Listing;

/// Trait for fetching the release listing of a configured provider
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Returns the type of provider this implementation handles
    fn provider_type(&self) -> ProviderType;

    /// Fetches the current listing for a provider
    ///
    /// # Arguments
    /// * `provider` - Provider configuration; must match [`Registry::provider_type`]
    /// * `game_version` - Minecraft version, for providers that filter server-side
    ///
    /// # Returns
    /// * `Ok(Listing)` - Raw listing, ready for resolution
    /// * `Err(RegistryError)` - If the fetch fails
    async fn fetch_listing(
        &self,
        provider: &ProviderKind,
        game_version: &str,
    ) -> Result<Listing, RegistryError>;
}
