//! Settings file fixtures

use std::path::{Path, PathBuf};

use mod_updater::updater::settings::{InstalledMod, Minecraft, Settings};
use mod_updater::version::provider::{
    CurseForgeProvider, GitHubProvider, Provider, ProviderKind,
};

pub fn github_provider(key: &str, use_tag: bool) -> Provider {
    Provider {
        key: key.to_string(),
        kind: ProviderKind::GitHub(GitHubProvider {
            author: "CaffeineMC".to_string(),
            repository: "sodium-fabric".to_string(),
            asset_regex: r"\.jar$".to_string(),
            minecraft_version_regex: r"mc(\d+\.\d+(?:\.\d+)?)".to_string(),
            mod_version_regex: r"mc[\d.]+-(\d+\.\d+\.\d+)".to_string(),
            use_release_tag_as_version: use_tag,
        }),
    }
}

pub fn curseforge_provider(key: &str, project_id: i64) -> Provider {
    Provider {
        key: key.to_string(),
        kind: ProviderKind::CurseForge(CurseForgeProvider {
            project_id,
            minecraft_version_regex: r"-(\d+\.\d+\.\d+)-".to_string(),
            mod_version_regex: r"-(\d+\.\d+\.\d+)\.jar$".to_string(),
            extract_from_field: "filename".to_string(),
            mod_version_extract_from_field: None,
            fallback_extract_from_field: None,
            loader_name: None,
        }),
    }
}

pub fn installed_mod(
    name: &str,
    provider_key: &str,
    version: Option<&str>,
    filename: Option<&str>,
) -> InstalledMod {
    InstalledMod {
        name: name.to_string(),
        current_version: version.map(str::to_string),
        filename: filename.map(str::to_string),
        override_minecraft_version: None,
        provider_key: provider_key.to_string(),
    }
}

/// Write a settings file for a game installed under `root`
pub fn write_settings(
    root: &Path,
    installed_mods: Vec<InstalledMod>,
    providers: Vec<Provider>,
) -> (PathBuf, Settings) {
    let settings = Settings {
        minecraft: Minecraft {
            version: "1.19.2".to_string(),
            path: root.join("minecraft"),
            mod_folder_name: "mods".to_string(),
        },
        installed_mods,
        providers,
        updater: None,
    };
    std::fs::create_dir_all(settings.mods_dir()).unwrap();

    let path = root.join("appsettings.json");
    settings.save(&path).unwrap();
    (path, settings)
}
