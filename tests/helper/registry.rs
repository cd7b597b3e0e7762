//! Registry test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use mod_updater::version::error::RegistryError;
use mod_updater::version::provider::{ProviderKind, ProviderType};
use mod_updater::version::registry::Registry;
use mod_updater::version::types::Listing;

/// Registry serving fixed listings keyed by listing key
pub struct StaticRegistry {
    provider_type: ProviderType,
    listings: HashMap<String, Listing>,
    calls: AtomicUsize,
}

impl StaticRegistry {
    pub fn new(provider_type: ProviderType) -> Self {
        Self {
            provider_type,
            listings: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_listing(mut self, key: &str, listing: Listing) -> Self {
        self.listings.insert(key.to_string(), listing);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Registry for StaticRegistry {
    fn provider_type(&self) -> ProviderType {
        self.provider_type
    }

    async fn fetch_listing(
        &self,
        provider: &ProviderKind,
        game_version: &str,
    ) -> Result<Listing, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = provider.listing_key(game_version);
        self.listings
            .get(&key)
            .cloned()
            .ok_or(RegistryError::NotFound(key))
    }
}

/// Registry map as the updater service expects it
pub fn registries(
    entries: Vec<Arc<dyn Registry>>,
) -> HashMap<ProviderType, Arc<dyn Registry>> {
    entries
        .into_iter()
        .map(|registry| (registry.provider_type(), registry))
        .collect()
}
