//! Update run: fetch every listing, resolve, download and apply

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::{self, FETCH_STAGGER_DELAY_MS, UpdaterConfig};
use crate::updater::apply::apply_update;
use crate::updater::download::Downloader;
use crate::updater::error::{DownloadError, UpdateError};
use crate::updater::settings::Settings;
use crate::version::cache::Cache;
use crate::version::provider::{ProviderKind, ProviderType};
use crate::version::registries::{build_client, create_default_registries};
use crate::version::registry::Registry;
use crate::version::resolvers::resolve;
use crate::version::types::{Candidate, Outcome};

/// Counts of what happened to each installed mod during one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Mods whose listing was fetched and resolved
    pub checked: usize,
    pub up_to_date: usize,
    /// Mods for which no matching release was found
    pub no_match: usize,
    /// Mods with a newer release, whether or not it was installed
    pub available: usize,
    /// Names of mods that were downloaded and installed
    pub updated: Vec<String>,
    /// Mods without a usable provider
    pub skipped: usize,
    /// Mods whose fetch, resolution or install failed
    pub failed: usize,
}

impl UpdateSummary {
    /// Whether any installed mod state changed
    pub fn changed(&self) -> bool {
        !self.updated.is_empty()
    }
}

/// One mod scheduled for a fetch
struct Job {
    index: usize,
    provider: ProviderKind,
    game_version: String,
    registry: Arc<dyn Registry>,
}

pub struct UpdaterService {
    registries: HashMap<ProviderType, Arc<dyn Registry>>,
    downloader: Downloader,
    dry_run: bool,
}

impl UpdaterService {
    pub fn new(
        registries: HashMap<ProviderType, Arc<dyn Registry>>,
        downloader: Downloader,
        dry_run: bool,
    ) -> Self {
        Self {
            registries,
            downloader,
            dry_run,
        }
    }

    /// Check every installed mod and install available updates.
    ///
    /// Listings are fetched concurrently with staggered starts; resolution,
    /// download and apply then run one mod at a time. Installed mod entries
    /// in `settings` are updated in place.
    pub async fn update(&self, settings: &mut Settings) -> UpdateSummary {
        let start = Instant::now();
        let mut summary = UpdateSummary::default();
        let jobs = self.plan(settings, &mut summary);

        let fetches = jobs.iter().enumerate().map(|(i, job)| {
            let delay = Duration::from_millis(FETCH_STAGGER_DELAY_MS * i as u64);
            async move {
                sleep(delay).await;
                job.registry
                    .fetch_listing(&job.provider, &job.game_version)
                    .await
            }
        });
        let listings = join_all(fetches).await;

        let mods_dir = settings.mods_dir();
        for (job, listing) in jobs.iter().zip(listings) {
            let installed = &mut settings.installed_mods[job.index];
            info!(
                "Checking for updates on {} for Minecraft {}",
                installed.name, job.game_version
            );

            let listing = match listing {
                Ok(listing) => listing,
                Err(e) => {
                    error!("Failed to fetch listing for {}: {}", installed.name, e);
                    summary.failed += 1;
                    continue;
                }
            };

            let current = installed.current_version().to_string();
            let decision = match resolve(&job.provider, &listing, &current, &job.game_version) {
                Ok(decision) => decision,
                Err(e) => {
                    error!("Failed to resolve {}: {}", installed.name, e);
                    summary.failed += 1;
                    continue;
                }
            };
            summary.checked += 1;

            match decision.outcome() {
                Outcome::NoMatch => {
                    warn!(
                        "No release of {} found for Minecraft {}",
                        installed.name, job.game_version
                    );
                    summary.no_match += 1;
                }
                Outcome::UpToDate => {
                    info!("{} {} is up to date", installed.name, current);
                    summary.up_to_date += 1;
                }
                Outcome::UpdateAvailable => {
                    let (Some(version), Some(candidate)) =
                        (decision.resolved_version, decision.chosen)
                    else {
                        continue;
                    };
                    summary.available += 1;

                    if self.dry_run {
                        info!(
                            "Update available for {} {} -> {} ({})",
                            installed.name, current, version, candidate.file_name
                        );
                        continue;
                    }

                    info!(
                        "Downloading update for {} {} -> {}",
                        installed.name, current, version
                    );
                    let previous = installed.installed_file().map(str::to_string);
                    match self.install(&mods_dir, previous.as_deref(), &candidate).await {
                        Ok(file_name) => {
                            installed.filename = Some(file_name);
                            installed.current_version = Some(version);
                            summary.updated.push(installed.name.clone());
                        }
                        Err(e) => {
                            error!("Failed to install update for {}: {}", installed.name, e);
                            summary.failed += 1;
                        }
                    }
                }
            }
        }

        info!(
            "Finished update process in {:.4} ms",
            start.elapsed().as_secs_f64() * 1000.0
        );
        info!("{} mod(s) were updated", summary.updated.len());
        summary
    }

    /// Pair every installed mod with its provider and registry
    fn plan(&self, settings: &Settings, summary: &mut UpdateSummary) -> Vec<Job> {
        let mut jobs = Vec::new();

        for (index, installed) in settings.installed_mods.iter().enumerate() {
            let Some(provider) = settings.provider(&installed.provider_key) else {
                warn!(
                    "No provider '{}' configured for {}, skipping",
                    installed.provider_key, installed.name
                );
                summary.skipped += 1;
                continue;
            };

            let provider_type = provider.kind.provider_type();
            let Some(registry) = self.registries.get(&provider_type) else {
                warn!(
                    "No registry for {} providers, skipping {}",
                    provider_type.as_str(),
                    installed.name
                );
                summary.skipped += 1;
                continue;
            };

            jobs.push(Job {
                index,
                provider: provider.kind.clone(),
                game_version: installed
                    .game_version(&settings.minecraft.version)
                    .to_string(),
                registry: registry.clone(),
            });
        }

        jobs
    }

    async fn install(
        &self,
        mods_dir: &Path,
        previous_file: Option<&str>,
        candidate: &Candidate,
    ) -> Result<String, DownloadError> {
        let file_name = self.downloader.download(candidate).await?;
        apply_update(
            mods_dir,
            self.downloader.staging_dir(),
            previous_file,
            &file_name,
        )?;
        Ok(file_name)
    }
}

/// Open the listing cache, or run without one if it is disabled or unusable
fn open_cache(updater: &UpdaterConfig) -> Option<Arc<Cache>> {
    if updater.cache_ttl_ms <= 0 {
        return None;
    }

    if let Err(e) = std::fs::create_dir_all(config::data_dir()) {
        warn!("Failed to create data directory, caching disabled: {}", e);
        return None;
    }

    match Cache::new(&config::db_path(), updater.cache_ttl_ms) {
        Ok(cache) => {
            if let Err(e) = cache.purge_expired() {
                warn!("Failed to purge expired listings: {}", e);
            }
            Some(Arc::new(cache))
        }
        Err(e) => {
            warn!("Failed to open listing cache, caching disabled: {}", e);
            None
        }
    }
}

/// Relative staging directories are resolved against the settings file
fn staging_dir(settings_path: &Path, updater: &UpdaterConfig) -> PathBuf {
    if updater.staging_dir.is_absolute() {
        return updater.staging_dir.clone();
    }
    settings_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(&updater.staging_dir)
}

/// Load the settings file, update every mod and save the settings back if
/// anything was installed.
pub async fn run(settings_path: &Path, dry_run: bool) -> Result<UpdateSummary, UpdateError> {
    info!("Starting the process to update mods");

    let mut settings = Settings::load(settings_path)?;
    let updater = settings.updater_config();

    let client = build_client(Duration::from_millis(updater.request_timeout_ms))?;
    let registries = create_default_registries(&client, open_cache(&updater));
    let downloader = Downloader::new(client, staging_dir(settings_path, &updater));

    let service = UpdaterService::new(registries, downloader, dry_run);
    let summary = service.update(&mut settings).await;

    if summary.changed() {
        settings.save(settings_path)?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::updater::settings::{InstalledMod, Minecraft};
    use crate::version::error::RegistryError;
    use crate::version::provider::{MasadyProvider, Provider};
    use crate::version::registry::MockRegistry;
    use crate::version::types::Listing;
    use mockito::Server;
    use reqwest::Client;
    use tempfile::TempDir;

    const PATTERN: &str = r#"<td>([^<]+)</td><td><a href="([^"]+)">"#;

    fn settings(root: &Path, mods: Vec<InstalledMod>) -> Settings {
        Settings {
            minecraft: Minecraft {
                version: "1.19.2".to_string(),
                path: root.to_path_buf(),
                mod_folder_name: "mods".to_string(),
            },
            installed_mods: mods,
            providers: vec![Provider {
                key: "minihud".to_string(),
                kind: ProviderKind::Masady(MasadyProvider {
                    mod_name: "minihud".to_string(),
                    html_extractor_regex: PATTERN.to_string(),
                }),
            }],
            updater: None,
        }
    }

    fn minihud(version: Option<&str>, filename: Option<&str>) -> InstalledMod {
        InstalledMod {
            name: "MiniHUD".to_string(),
            current_version: version.map(str::to_string),
            filename: filename.map(str::to_string),
            override_minecraft_version: None,
            provider_key: "minihud".to_string(),
        }
    }

    fn page(base: &str) -> String {
        format!(
            r#"<table>
            <tr><td>0.23.0</td><td><a href="{base}/files/minihud-0.23.0.jar">dl</a></td></tr>
            <tr><td>0.23.1</td><td><a href="{base}/files/minihud-0.23.1.jar">dl</a></td></tr>
            </table>"#
        )
    }

    fn registries(mock: MockRegistry) -> HashMap<ProviderType, Arc<dyn Registry>> {
        HashMap::from([(ProviderType::Masady, Arc::new(mock) as Arc<dyn Registry>)])
    }

    fn masady_registry(html: String) -> MockRegistry {
        let mut registry = MockRegistry::new();
        registry
            .expect_provider_type()
            .returning(|| ProviderType::Masady);
        registry
            .expect_fetch_listing()
            .returning(move |_, _| Ok(Listing::Masady(html.clone())));
        registry
    }

    #[tokio::test]
    async fn update_installs_newer_release_and_records_it() {
        let mut server = Server::new_async().await;
        let download = server
            .mock("GET", "/files/minihud-0.23.1.jar")
            .with_status(200)
            .with_body("new jar")
            .create_async()
            .await;
        let root = TempDir::new().unwrap();
        let mods_dir = root.path().join("mods");
        std::fs::create_dir_all(&mods_dir).unwrap();
        std::fs::write(mods_dir.join("minihud-0.22.0.jar"), "old jar").unwrap();
        let mut settings = settings(
            root.path(),
            vec![minihud(Some("0.22.0"), Some("minihud-0.22.0.jar"))],
        );
        let service = UpdaterService::new(
            registries(masady_registry(page(&server.url()))),
            Downloader::new(Client::new(), root.path().join("downloads")),
            false,
        );

        let summary = service.update(&mut settings).await;

        download.assert_async().await;
        assert_eq!(summary.updated, vec!["MiniHUD".to_string()]);
        assert_eq!(summary.available, 1);
        assert!(summary.changed());
        let installed = &settings.installed_mods[0];
        assert_eq!(installed.current_version(), "0.23.1");
        assert_eq!(installed.installed_file(), Some("minihud-0.23.1.jar"));
        assert!(mods_dir.join("minihud-0.22.0.jar.disabled").exists());
        assert_eq!(
            std::fs::read_to_string(mods_dir.join("minihud-0.23.1.jar")).unwrap(),
            "new jar"
        );
    }

    #[tokio::test]
    async fn update_leaves_current_mod_alone() {
        let root = TempDir::new().unwrap();
        let mut settings = settings(
            root.path(),
            vec![minihud(Some("0.23.1"), Some("minihud-0.23.1.jar"))],
        );
        let original = settings.clone();
        let service = UpdaterService::new(
            registries(masady_registry(page("http://127.0.0.1:9"))),
            Downloader::new(Client::new(), root.path().join("downloads")),
            false,
        );

        let summary = service.update(&mut settings).await;

        assert_eq!(summary.up_to_date, 1);
        assert!(!summary.changed());
        assert_eq!(settings, original);
    }

    #[tokio::test]
    async fn dry_run_reports_without_downloading() {
        let root = TempDir::new().unwrap();
        let mut settings = settings(root.path(), vec![minihud(None, None)]);
        let original = settings.clone();
        let service = UpdaterService::new(
            registries(masady_registry(page("http://127.0.0.1:9"))),
            Downloader::new(Client::new(), root.path().join("downloads")),
            true,
        );

        let summary = service.update(&mut settings).await;

        assert_eq!(summary.available, 1);
        assert!(summary.updated.is_empty());
        assert_eq!(settings, original);
        assert!(!root.path().join("downloads").exists());
    }

    #[tokio::test]
    async fn update_skips_mods_without_provider() {
        let root = TempDir::new().unwrap();
        let mut orphan = minihud(Some("1.0.0"), None);
        orphan.provider_key = "unknown".to_string();
        let mut settings = settings(root.path(), vec![orphan]);
        let mut registry = MockRegistry::new();
        registry
            .expect_provider_type()
            .returning(|| ProviderType::Masady);
        registry.expect_fetch_listing().times(0);
        let service = UpdaterService::new(
            registries(registry),
            Downloader::new(Client::new(), root.path().join("downloads")),
            false,
        );

        let summary = service.update(&mut settings).await;

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.checked, 0);
    }

    #[tokio::test]
    async fn fetch_failure_does_not_stop_other_mods() {
        let root = TempDir::new().unwrap();
        let mut pinned = minihud(Some("0.23.1"), None);
        pinned.name = "MiniHUD pinned".to_string();
        pinned.override_minecraft_version = Some("1.18.2".to_string());
        let mut settings = settings(root.path(), vec![minihud(Some("0.23.1"), None), pinned]);
        let html = page("http://127.0.0.1:9");
        let mut registry = MockRegistry::new();
        registry
            .expect_provider_type()
            .returning(|| ProviderType::Masady);
        registry
            .expect_fetch_listing()
            .withf(|_, game_version| game_version == "1.18.2")
            .returning(|_, _| Err(RegistryError::NotFound("minihud".to_string())));
        registry
            .expect_fetch_listing()
            .withf(|_, game_version| game_version == "1.19.2")
            .returning(move |_, _| Ok(Listing::Masady(html.clone())));
        let service = UpdaterService::new(
            registries(registry),
            Downloader::new(Client::new(), root.path().join("downloads")),
            false,
        );

        let summary = service.update(&mut settings).await;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.up_to_date, 1);
    }

    #[tokio::test]
    async fn failed_download_keeps_installed_state() {
        let mut server = Server::new_async().await;
        let _download = server
            .mock("GET", "/files/minihud-0.23.1.jar")
            .with_status(404)
            .create_async()
            .await;
        let root = TempDir::new().unwrap();
        let mut settings = settings(
            root.path(),
            vec![minihud(Some("0.22.0"), Some("minihud-0.22.0.jar"))],
        );
        let original = settings.clone();
        let service = UpdaterService::new(
            registries(masady_registry(page(&server.url()))),
            Downloader::new(Client::new(), root.path().join("downloads")),
            false,
        );

        let summary = service.update(&mut settings).await;

        assert_eq!(summary.failed, 1);
        assert!(!summary.changed());
        assert_eq!(settings, original);
    }

    #[test]
    fn relative_staging_dir_is_resolved_next_to_settings() {
        let config = UpdaterConfig::default();

        assert_eq!(
            staging_dir(Path::new("/srv/mc/appsettings.json"), &config),
            PathBuf::from("/srv/mc/downloads")
        );
        assert_eq!(
            staging_dir(Path::new("appsettings.json"), &config),
            PathBuf::from("downloads")
        );
    }
}
