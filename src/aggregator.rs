//! Recursive walk of a share tree into a flat list of files.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::client::ListingClient;
use crate::config::TraversalPolicy;
use crate::error::{Result, ShareError};
use crate::models::{EntryKind, FileRecord};
use crate::share_key::ShareKey;

/// Walks every folder reachable from a share root, depth first.
#[derive(Clone)]
pub struct Aggregator {
    client: ListingClient,
    policy: TraversalPolicy,
}

impl Aggregator {
    pub fn new(client: ListingClient, policy: TraversalPolicy) -> Self {
        Self { client, policy }
    }

    /// Collect all files of the share.
    ///
    /// Folders are fetched one at a time; a subfolder is fully walked before
    /// its later siblings, and siblings keep provider order. A failure listing
    /// the root is always returned. Below the root, a provider error payload
    /// follows the configured [`TraversalPolicy`]; network and parse failures
    /// are always returned.
    pub async fn list_all_files(&self, key: &ShareKey) -> Result<Vec<FileRecord>> {
        let mut files = Vec::new();
        self.walk(key, None, &mut files).await?;
        tracing::debug!(share = %key, files = files.len(), "Share walk finished");
        Ok(files)
    }

    fn walk<'a>(
        &'a self,
        key: &'a ShareKey,
        path: Option<&'a str>,
        files: &'a mut Vec<FileRecord>,
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            let entries = match (self.client.fetch_entries(key, path).await, path) {
                (Ok(entries), _) => entries,
                (Err(e @ ShareError::RemoteApi { .. }), Some(sub))
                    if self.policy == TraversalPolicy::BestEffort =>
                {
                    tracing::warn!(share = %key, path = sub, error = %e, "Skipping folder");
                    return Ok(());
                }
                (Err(e), _) => return Err(e),
            };

            for entry in entries {
                match entry.kind {
                    EntryKind::File => match FileRecord::from_entry(&entry) {
                        Some(record) => files.push(record),
                        None => tracing::warn!(path = %entry.path, "File has no download URL"),
                    },
                    EntryKind::Dir => self.walk(key, Some(&entry.path), files).await?,
                    EntryKind::Other => {
                        tracing::warn!(path = %entry.path, "Skipping entry of unknown type")
                    }
                }
            }

            Ok(())
        }
        .boxed()
    }
}
