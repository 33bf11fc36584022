//! Time-bounded in-memory cache of aggregated listings.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::models::FileRecord;
use crate::share_key::ShareKey;

/// Cached listing with expiration.
#[derive(Clone)]
struct CachedListing {
    files: Vec<FileRecord>,
    expires_at: Instant,
}

/// Share key to file list, with a fixed TTL and a maximum entry count.
///
/// Expired entries are dropped lazily on read, and before any capacity
/// eviction. When the cache is full, the entry closest to expiry goes first.
pub struct ListingCache {
    ttl: Duration,
    capacity: usize,
    entries: RwLock<HashMap<ShareKey, CachedListing>>,
}

impl ListingCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get the cached listing for `key`, if it has not expired.
    pub async fn get(&self, key: &ShareKey) -> Option<Vec<FileRecord>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(cached) if cached.expires_at > Instant::now() => {
                    return Some(cached.files.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|cached| cached.expires_at <= Instant::now())
        {
            entries.remove(key);
        }
        None
    }

    /// Store a listing. Returns the key evicted to make room, if any.
    pub async fn put(&self, key: ShareKey, files: Vec<FileRecord>) -> Option<ShareKey> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let mut evicted = None;
        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            entries.retain(|_, cached| cached.expires_at > now);

            if entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, cached)| cached.expires_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    entries.remove(&oldest);
                    tracing::debug!(share = %oldest, "Evicted cached listing");
                    evicted = Some(oldest);
                }
            }
        }

        entries.insert(
            key,
            CachedListing {
                files,
                expires_at: now + self.ttl,
            },
        );
        evicted
    }

    pub async fn invalidate(&self, key: &ShareKey) {
        self.entries.write().await.remove(key);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, expired ones included until they are swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
