//! Service configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Default public resources endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "https://cloud-api.yandex.net/v1/disk/public/resources";

/// Listings stay cached for ten minutes.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// What the aggregator does when a folder below the root fails to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalPolicy {
    /// Log the failure and leave that branch out of the result.
    #[default]
    BestEffort,
    /// Fail the whole listing.
    FailFast,
}

/// Settings for [`ShareService`](crate::ShareService).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub api_endpoint: String,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    /// Directory under which per-request scratch directories are created.
    pub temp_root: PathBuf,
    pub request_timeout: Option<Duration>,
    /// Files fetched at once by a bulk download. `1` is strictly sequential.
    pub download_concurrency: usize,
    pub traversal: TraversalPolicy,
    /// Forwarded to the provider as `limit` when set.
    pub page_limit: Option<u32>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            temp_root: std::env::temp_dir(),
            request_timeout: None,
            download_concurrency: 1,
            traversal: TraversalPolicy::default(),
            page_limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.download_concurrency, 1);
        assert_eq!(config.traversal, TraversalPolicy::BestEffort);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ServiceConfig = serde_json::from_str(
            r#"{"traversal": "fail-fast", "download_concurrency": 4}"#,
        )
        .unwrap();
        assert_eq!(config.traversal, TraversalPolicy::FailFast);
        assert_eq!(config.download_concurrency, 4);
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
    }
}
