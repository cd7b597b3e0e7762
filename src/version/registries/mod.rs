//! Registry implementations for fetching provider listings

pub mod cached;
pub mod curseforge;
pub mod github;
pub mod masady;

pub use cached::CachingRegistry;
pub use curseforge::CurseForgeRegistry;
pub use github::GitHubRegistry;
pub use masady::MasadyRegistry;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, error, warn};

use crate::config::USER_AGENT;
use crate::version::cache::Cache;
use crate::version::error::RegistryError;
use crate::version::provider::ProviderType;
use crate::version::registry::Registry;

/// Build the HTTP client shared by all registries and the downloader
pub fn build_client(timeout: Duration) -> Result<Client, RegistryError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Create the default registry for every provider type.
///
/// When a cache is given every registry is wrapped so listings are reused
/// for the cache lifetime.
pub fn create_default_registries(
    client: &Client,
    cache: Option<Arc<Cache>>,
) -> HashMap<ProviderType, Arc<dyn Registry>> {
    let registries: Vec<Arc<dyn Registry>> = vec![
        Arc::new(GitHubRegistry::with_client(client.clone())),
        Arc::new(CurseForgeRegistry::with_client(client.clone())),
        Arc::new(MasadyRegistry::with_client(client.clone())),
    ];

    registries
        .into_iter()
        .map(|registry| {
            let registry: Arc<dyn Registry> = match &cache {
                Some(cache) => Arc::new(CachingRegistry::new(registry, cache.clone())),
                None => registry,
            };
            (registry.provider_type(), registry)
        })
        .collect()
}

/// Send a request, logging method, path, status and elapsed time.
///
/// Successful exchanges are logged at debug level; server errors and
/// transport failures at error level.
pub async fn send_logged(client: &Client, request: RequestBuilder) -> Result<Response, RegistryError> {
    let request = request.build()?;
    let method = request.method().clone();
    let path = match request.url().query() {
        Some(query) => format!("{}?{}", request.url().path(), query),
        None => request.url().path().to_string(),
    };

    let start = Instant::now();
    let result = client.execute(request).await;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(response) => {
            let status = response.status().as_u16();
            if response.status().is_server_error() {
                error!("HTTP {} {} responded {} in {:.4} ms", method, path, status, elapsed_ms);
            } else {
                debug!("HTTP {} {} responded {} in {:.4} ms", method, path, status, elapsed_ms);
            }
            Ok(response)
        }
        Err(e) => {
            error!("HTTP {} {} failed in {:.4} ms: {}", method, path, elapsed_ms, e);
            Err(e.into())
        }
    }
}

/// Map unsuccessful statuses to registry errors
pub(crate) fn check_status(response: Response, subject: &str) -> Result<Response, RegistryError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(subject.to_string()));
    }

    let exhausted = status == StatusCode::FORBIDDEN
        && response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0");

    if status == StatusCode::TOO_MANY_REQUESTS || exhausted {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(RegistryError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    if !status.is_success() {
        warn!("{} returned status {}", subject, status);
        return Err(RegistryError::InvalidResponse(format!(
            "Unexpected status: {}",
            status
        )));
    }

    Ok(response)
}
