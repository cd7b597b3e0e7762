//! Registry decorator that reuses recently fetched listings

use std::sync::Arc;

use tracing::{debug, warn};

use crate::version::cache::Cache;
use crate::version::error::RegistryError;
use crate::version::provider::{ProviderKind, ProviderType};
use crate::version::registry::Registry;
use crate::version::types::Listing;

/// Wraps a registry and serves listings from the cache while they are fresh.
///
/// Cache failures never fail a fetch: they are logged and the inner
/// registry is asked instead.
pub struct CachingRegistry {
    inner: Arc<dyn Registry>,
    cache: Arc<Cache>,
}

impl CachingRegistry {
    pub fn new(inner: Arc<dyn Registry>, cache: Arc<Cache>) -> Self {
        Self { inner, cache }
    }

    fn cached(&self, key: &str) -> Option<Listing> {
        let provider_type = self.inner.provider_type();
        let body = match self.cache.get_listing(provider_type, key) {
            Ok(body) => body?,
            Err(e) => {
                warn!("Failed to read cached {} listing {}: {}", provider_type.as_str(), key, e);
                return None;
            }
        };

        match serde_json::from_str(&body) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!("Discarding unreadable cached listing {}: {}", key, e);
                None
            }
        }
    }

    fn remember(&self, key: &str, listing: &Listing) {
        let provider_type = self.inner.provider_type();
        let body = match serde_json::to_string(listing) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to serialize {} listing {}: {}", provider_type.as_str(), key, e);
                return;
            }
        };

        if let Err(e) = self.cache.store_listing(provider_type, key, &body) {
            warn!("Failed to cache {} listing {}: {}", provider_type.as_str(), key, e);
        }
    }
}

#[async_trait::async_trait]
impl Registry for CachingRegistry {
    fn provider_type(&self) -> ProviderType {
        self.inner.provider_type()
    }

    async fn fetch_listing(
        &self,
        provider: &ProviderKind,
        game_version: &str,
    ) -> Result<Listing, RegistryError> {
        let key = provider.listing_key(game_version);

        if let Some(listing) = self.cached(&key) {
            debug!("Cache hit for {} listing {}", self.provider_type().as_str(), key);
            return Ok(listing);
        }

        let listing = self.inner.fetch_listing(provider, game_version).await?;
        self.remember(&key, &listing);
        Ok(listing)
    }
}
