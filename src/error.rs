//! Error types for the disk_share crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while listing or downloading from a public share.
#[derive(Error, Debug)]
pub enum ShareError {
    #[error("API error {error}: {description}")]
    RemoteApi { error: String, description: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Invalid share key: {0:?}")]
    InvalidShareKey(String),

    #[error("Invalid download token: {0}")]
    InvalidToken(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ShareError {
    /// HTTP status an outer web layer should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShareError::BadRequest(_) | ShareError::InvalidShareKey(_) => StatusCode::BAD_REQUEST,
            ShareError::NotFound(_) | ShareError::InvalidToken(_) => StatusCode::NOT_FOUND,
            ShareError::RemoteApi { .. } | ShareError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result type alias for ShareError.
pub type Result<T> = std::result::Result<T, ShareError>;
