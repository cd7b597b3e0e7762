use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// =============================================================================
// Time-related constants
// =============================================================================

/// Default lifetime of a cached provider listing in milliseconds (5 minutes)
pub const DEFAULT_CACHE_TTL_MS: i64 = 5 * 60 * 1000;

/// Timeout for a single HTTP request in milliseconds (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Delay between starting each fetch request to avoid rate limiting (10ms)
pub const FETCH_STAGGER_DELAY_MS: u64 = 10;

// =============================================================================
// Update behavior
// =============================================================================

/// Directory downloads are staged in before being moved into the mods folder
pub const DEFAULT_STAGING_DIR: &str = "downloads";

/// Suffix appended to a replaced mod file so the game stops loading it
pub const DISABLED_SUFFIX: &str = ".disabled";

/// Loader name the CurseForge fallback tier looks for
pub const DEFAULT_LOADER_NAME: &str = "fabric";

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("mod-updater/", env!("CARGO_PKG_VERSION"));

/// Optional `Updater` section of the settings file
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct UpdaterConfig {
    /// Directory downloads are staged in
    pub staging_dir: PathBuf,
    /// Listing cache lifetime in milliseconds, 0 disables the cache
    pub cache_ttl_ms: i64,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

/// Returns the path to the data directory for mod-updater.
/// Uses $XDG_DATA_HOME/mod-updater if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/mod-updater,
/// or ./mod-updater if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the listing cache database.
pub fn db_path() -> PathBuf {
    data_dir().join("listings.db")
}

/// Returns the directory log files are written to.
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("mod-updater")
}
