//! Download of chosen candidates into the staging directory

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::updater::error::DownloadError;
use crate::version::registries::send_logged;
use crate::version::types::Candidate;

/// Suffix of a file that is still being written
const PARTIAL_SUFFIX: &str = ".part";

/// Streams candidate files into a staging directory
pub struct Downloader {
    client: Client,
    staging_dir: PathBuf,
}

impl Downloader {
    pub fn new(client: Client, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            staging_dir: staging_dir.into(),
        }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Download a candidate, returning the staged file name.
    ///
    /// The name is the URL-decoded last path segment of the download URL.
    /// The body is written to a partial file first and renamed once
    /// complete, so an interrupted download never leaves a truncated jar
    /// under the final name.
    pub async fn download(&self, candidate: &Candidate) -> Result<String, DownloadError> {
        let url = &candidate.download_url;
        let file_name = staged_file_name(url)?;

        tokio::fs::create_dir_all(&self.staging_dir).await?;
        let target = self.staging_dir.join(&file_name);
        let partial = self.staging_dir.join(format!("{}{}", file_name, PARTIAL_SUFFIX));

        let response = send_logged(&self.client, self.client.get(url)).await?;
        if !response.status().is_success() {
            return Err(DownloadError::Status {
                url: url.clone(),
                status: response.status().as_u16(),
            });
        }

        let result = write_body(response, &partial).await;
        if let Err(e) = result {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
        tokio::fs::rename(&partial, &target).await?;

        info!("Downloaded {} to {:?}", file_name, target);
        Ok(file_name)
    }
}

async fn write_body(response: reqwest::Response, path: &Path) -> Result<u64, DownloadError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    debug!("Wrote {} bytes to {:?}", written, path);
    Ok(written)
}

/// File name a download is staged under
fn staged_file_name(url: &str) -> Result<String, DownloadError> {
    let name = Candidate::from_url(url).file_name;
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\']);

    if invalid {
        return Err(DownloadError::InvalidFileName(url.to_string()));
    }
    Ok(name)
}
