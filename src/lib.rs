//! disk_share - Browse and download files of a public cloud-disk share.
//!
//! This library provides functionality to:
//! - List every file of a public share, walking its folders recursively
//! - Cache listings per share key for a fixed time
//! - Download one file, or several files bundled into a zip archive
//!
//! # Example
//!
//! ```no_run
//! use disk_share::{ServiceConfig, ShareService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = ShareService::new(ServiceConfig::default())?;
//!
//!     let files = service.list_files("https://disk.yandex.ru/d/AbC123").await?;
//!     for file in &files {
//!         println!("{}", file);
//!     }
//!
//!     let payload = service.download_single(&files[0].download_url).await?;
//!     println!("saved to {}", payload.path().display());
//!
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod archive;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod models;
pub mod service;
pub mod share_key;
pub mod token;

// Re-exports for convenience
pub use aggregator::Aggregator;
pub use cache::ListingCache;
pub use client::ListingClient;
pub use config::{ServiceConfig, TraversalPolicy};
pub use error::{Result, ShareError};
pub use fetcher::FileFetcher;
pub use models::{Entry, EntryKind, ErrorBody, FileRecord, ListingResponse};
pub use service::{Payload, ShareService};
pub use share_key::ShareKey;
