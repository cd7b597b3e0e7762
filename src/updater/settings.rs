//! Settings file: game install, installed mods and configured providers

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::UpdaterConfig;
use crate::updater::error::SettingsError;
use crate::version::provider::Provider;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Settings {
    pub minecraft: Minecraft,
    #[serde(default)]
    pub installed_mods: Vec<InstalledMod>,
    #[serde(default)]
    pub providers: Vec<Provider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updater: Option<UpdaterConfig>,
}

/// The game installation mods are applied to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Minecraft {
    pub version: String,
    pub path: PathBuf,
    pub mod_folder_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstalledMod {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_minecraft_version: Option<String>,
    pub provider_key: String,
}

impl InstalledMod {
    /// Installed version, empty when the mod was never downloaded
    pub fn current_version(&self) -> &str {
        self.current_version.as_deref().unwrap_or_default()
    }

    /// Game version this mod must target: its override if set, else `default`
    pub fn game_version<'a>(&'a self, default: &'a str) -> &'a str {
        self.override_minecraft_version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    /// Currently installed file name, if any
    pub fn installed_file(&self) -> Option<&str> {
        self.filename
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&content)?;

        for (i, provider) in settings.providers.iter().enumerate() {
            if settings.providers[..i].iter().any(|p| p.key == provider.key) {
                warn!("Duplicate provider key '{}', the first entry is used", provider.key);
            }
        }

        debug!(
            "Loaded {} mods and {} providers from {:?}",
            settings.installed_mods.len(),
            settings.providers.len(),
            path
        );
        Ok(settings)
    }

    /// Write the settings as pretty JSON, replacing the file atomically
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("tmp");
        let write_err = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };

        std::fs::write(&temp_path, content).map_err(write_err)?;
        std::fs::rename(&temp_path, path).map_err(write_err)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Look up a provider by key, the first match wins
    pub fn provider(&self, key: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.key == key)
    }

    pub fn updater_config(&self) -> UpdaterConfig {
        self.updater.clone().unwrap_or_default()
    }

    /// Folder the game loads mods from
    pub fn mods_dir(&self) -> PathBuf {
        self.minecraft.path.join(&self.minecraft.mod_folder_name)
    }
}
