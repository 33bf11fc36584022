//! Client for the provider's public resources endpoint.

use reqwest::Client;

use crate::error::{Result, ShareError};
use crate::models::{ApiErrorResponse, Entry, ResourceList};
use crate::share_key::ShareKey;

/// Lists one folder of a public share per call.
#[derive(Clone)]
pub struct ListingClient {
    endpoint: String,
    page_limit: Option<u32>,
    http: Client,
}

impl ListingClient {
    /// Create a new ListingClient.
    ///
    /// # Arguments
    /// * `http` - Shared HTTP client
    /// * `endpoint` - Full URL of the public resources endpoint
    pub fn new(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            page_limit: None,
            http,
        }
    }

    /// Ask the provider for up to `limit` items per folder.
    pub fn with_page_limit(mut self, limit: Option<u32>) -> Self {
        self.page_limit = limit;
        self
    }

    /// Fetch the entries of the share root, or of `sub_path` inside it.
    ///
    /// An `error` field in the response body is returned as
    /// [`ShareError::RemoteApi`] without retrying.
    pub async fn fetch_entries(&self, key: &ShareKey, sub_path: Option<&str>) -> Result<Vec<Entry>> {
        let mut request = self
            .http
            .get(&self.endpoint)
            .query(&[("public_key", key.as_str())]);

        if let Some(path) = sub_path {
            request = request.query(&[("path", path)]);
        }
        if let Some(limit) = self.page_limit {
            request = request.query(&[("limit", limit)]);
        }

        tracing::debug!(share = %key, path = sub_path.unwrap_or("/"), "Fetching folder");

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
            return Err(api_error.into());
        }
        if !status.is_success() {
            return Err(ShareError::RemoteApi {
                error: status.to_string(),
                description: body,
            });
        }

        let list: ResourceList = serde_json::from_str(&body)?;
        Ok(list.into_items())
    }
}
