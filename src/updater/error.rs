use std::path::PathBuf;

use thiserror::Error;

use crate::version::error::RegistryError;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write settings {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Request failed: {0}")]
    Request(#[from] RegistryError),

    #[error("Download interrupted: {0}")]
    Stream(#[from] reqwest::Error),

    #[error("Download of {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Cannot derive a file name from {0}")]
    InvalidFileName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort an update run
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Failed to set up HTTP client: {0}")]
    Client(#[from] RegistryError),
}
