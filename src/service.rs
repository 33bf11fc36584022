//! Request-facing operations: listing, single download, bulk download.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use reqwest::{Client, StatusCode};
use tempfile::TempDir;

use crate::aggregator::Aggregator;
use crate::archive::package_as_archive;
use crate::cache::ListingCache;
use crate::client::ListingClient;
use crate::config::ServiceConfig;
use crate::error::{Result, ShareError};
use crate::fetcher::FileFetcher;
use crate::models::FileRecord;
use crate::share_key::ShareKey;
use crate::token::{decode_download_token, DownloadTask};

/// A file ready to be sent back, living in a request-scoped scratch directory.
///
/// The directory and everything in it is removed when the payload is dropped.
#[derive(Debug)]
pub struct Payload {
    path: PathBuf,
    workspace: TempDir,
}

impl Payload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Directory holding the payload.
    pub fn workspace(&self) -> &Path {
        self.workspace.path()
    }
}

/// Owns the listing cache and the remote-facing components.
pub struct ShareService {
    config: ServiceConfig,
    aggregator: Aggregator,
    fetcher: FileFetcher,
    cache: ListingCache,
}

impl ShareService {
    /// Build a service with an empty cache.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let client = ListingClient::new(http.clone(), config.api_endpoint.clone())
            .with_page_limit(config.page_limit);

        Ok(Self {
            aggregator: Aggregator::new(client, config.traversal),
            fetcher: FileFetcher::new(http),
            cache: ListingCache::new(config.cache_ttl, config.cache_capacity),
            config,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    /// List every file of a share, from cache when possible.
    ///
    /// Only successful walks are cached. Two concurrent misses for the same
    /// key both walk the share; the later write wins.
    pub async fn list_files(&self, raw_key: &str) -> Result<Vec<FileRecord>> {
        let key = ShareKey::parse(raw_key)?;

        if let Some(files) = self.cache.get(&key).await {
            tracing::info!(share = %key, files = files.len(), "Listing served from cache");
            return Ok(files);
        }

        tracing::info!(share = %key, "Listing cache miss");
        let files = self.aggregator.list_all_files(&key).await?;
        self.cache.put(key, files.clone()).await;
        Ok(files)
    }

    /// Download one file named by a compound download token.
    pub async fn download_single(&self, token: &str) -> Result<Payload> {
        let task = decode_download_token(token).map_err(|e| {
            tracing::error!(error = %e, "Undecodable download token");
            ShareError::NotFound("File not found".to_string())
        })?;

        let workspace = self.workspace()?;
        let path = self
            .fetcher
            .fetch_to_local(&task.download_url, &task.file_name, workspace.path())
            .await
            .map_err(|e| match e {
                ShareError::Http(ref http) if http.status() == Some(StatusCode::NOT_FOUND) => {
                    ShareError::NotFound(task.file_name.clone())
                }
                other => other,
            })?;

        Ok(Payload { path, workspace })
    }

    /// Download several files and bundle them into one zip archive.
    ///
    /// Items that fail to decode or download are logged and left out. Fails
    /// with [`ShareError::BadRequest`] for an empty list and with
    /// [`ShareError::NotFound`] when no item succeeds.
    pub async fn download_multiple(&self, tokens: &[String]) -> Result<Payload> {
        if tokens.is_empty() {
            return Err(ShareError::BadRequest("No files provided".to_string()));
        }

        let mut taken = HashSet::new();
        let tasks: Vec<DownloadTask> = tokens
            .iter()
            .filter_map(|token| match decode_download_token(token) {
                Ok(mut task) => {
                    task.file_name = unique_name(&mut taken, &task.file_name);
                    Some(task)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable download token");
                    None
                }
            })
            .collect();

        let workspace = self.workspace()?;
        let dir = workspace.path();
        let fetcher = &self.fetcher;

        let downloaded: Vec<PathBuf> = stream::iter(tasks)
            .map(|task| async move {
                match fetcher.fetch_to_local(&task.download_url, &task.file_name, dir).await {
                    Ok(path) => Some(path),
                    Err(e) => {
                        tracing::warn!(file = %task.file_name, error = %e, "Skipping failed download");
                        None
                    }
                }
            })
            .buffered(self.config.download_concurrency.max(1))
            .filter_map(|path| async move { path })
            .collect()
            .await;

        if downloaded.is_empty() {
            return Err(ShareError::NotFound("No valid files found".to_string()));
        }

        let path = package_as_archive(downloaded, dir).await?;
        Ok(Payload { path, workspace })
    }

    fn workspace(&self) -> Result<TempDir> {
        Ok(tempfile::Builder::new()
            .prefix("disk-share-")
            .tempdir_in(&self.config.temp_root)?)
    }
}

/// `name`, or `stem (n).ext` if a file of that name is already claimed.
fn unique_name(taken: &mut HashSet<String>, name: &str) -> String {
    if taken.insert(name.to_string()) {
        return name.to_string();
    }

    let path = Path::new(name);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(name);
    let ext = path.extension().and_then(|e| e.to_str());

    let mut n = 1;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{} ({}).{}", stem, n, ext),
            None => format!("{} ({})", stem, n),
        };
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
