//! Data models for the public resources API and the service responses.

use serde::{Deserialize, Serialize};

use crate::error::ShareError;
use crate::token::encode_download_url;

/// Kind of an item returned by a listing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    #[serde(other)]
    Other,
}

/// One raw item (file or directory) from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub path: String,
    /// Direct download URL, present on files only.
    #[serde(default, rename = "file")]
    pub download_url: Option<String>,
}

/// Response body of a successful `public/resources` call.
#[derive(Debug, Default, Deserialize)]
pub struct ResourceList {
    #[serde(default, rename = "_embedded")]
    pub embedded: Option<Embedded>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Embedded {
    #[serde(default)]
    pub items: Vec<Entry>,
}

impl ResourceList {
    /// Items of the listed folder; an absent `_embedded` block means no items.
    pub fn into_items(self) -> Vec<Entry> {
        self.embedded.map(|e| e.items).unwrap_or_default()
    }
}

/// Error payload returned by the provider.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<ApiErrorResponse> for ShareError {
    fn from(resp: ApiErrorResponse) -> Self {
        ShareError::RemoteApi {
            error: resp.error,
            description: resp.description.or(resp.message).unwrap_or_default(),
        }
    }
}

/// A file anywhere in the share tree, flattened for listings and caching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    /// Download URL with every `&` replaced by `|`.
    pub download_url: String,
    /// Path inside the share, without the leading separator.
    pub path: String,
}

impl FileRecord {
    /// Normalize a file entry. Returns `None` for directories and for files
    /// the provider did not give a download URL.
    pub fn from_entry(entry: &Entry) -> Option<Self> {
        if entry.kind != EntryKind::File {
            return None;
        }
        let url = entry.download_url.as_deref()?;
        Some(Self {
            name: entry.name.clone(),
            download_url: encode_download_url(url),
            path: entry
                .path
                .strip_prefix('/')
                .unwrap_or(&entry.path)
                .to_string(),
        })
    }
}

impl std::fmt::Display for FileRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.path, self.download_url)
    }
}

/// Successful body of a listing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingResponse {
    pub files: Vec<FileRecord>,
}

/// `{ "error": "..." }` body answered on failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&ShareError> for ErrorBody {
    fn from(err: &ShareError) -> Self {
        let error = match err {
            ShareError::RemoteApi { error, .. } => error.clone(),
            other => other.to_string(),
        };
        Self { error }
    }
}
