//! Streaming download of single files into a local directory.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::Result;

/// Downloads provider files to local paths.
#[derive(Clone)]
pub struct FileFetcher {
    http: Client,
}

impl FileFetcher {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Download `download_url` to `dir/file_name` and return that path.
    ///
    /// An existing file at the path is truncated. A non-success status is an
    /// error, and whatever was written before a failure is removed.
    pub async fn fetch_to_local(
        &self,
        download_url: &str,
        file_name: &str,
        dir: &Path,
    ) -> Result<PathBuf> {
        let local_path = dir.join(file_name);

        match self.stream_to(download_url, &local_path).await {
            Ok(bytes) => {
                tracing::debug!(path = %local_path.display(), bytes, "Downloaded file");
                Ok(local_path)
            }
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(&local_path).await {
                    if rm.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(path = %local_path.display(), error = %rm, "Could not remove partial file");
                    }
                }
                Err(e)
            }
        }
    }

    async fn stream_to(&self, download_url: &str, local_path: &Path) -> Result<u64> {
        let response = self.http.get(download_url).send().await?.error_for_status()?;

        // Stream to file
        let mut file = File::create(local_path).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;

        Ok(written)
    }
}
