//! disk_share CLI - Browse and download files of a public cloud-disk share.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use disk_share::config::{DEFAULT_API_ENDPOINT, DEFAULT_CACHE_CAPACITY};
use disk_share::logging::{self, LogFormat};
use disk_share::{ErrorBody, ListingResponse, Payload, ServiceConfig, ShareService, TraversalPolicy};

/// CLI tool for browsing and downloading public cloud-disk shares.
#[derive(Parser)]
#[command(name = "disk_share")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    service: ServiceArgs,

    /// Default log filter (RUST_LOG overrides it).
    #[arg(long, env = "DISK_SHARE_LOG", default_value = "info", global = true)]
    log_level: String,

    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// Append logs to this file instead of stderr.
    #[arg(long, env = "DISK_SHARE_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ServiceArgs {
    /// Public resources endpoint of the provider.
    #[arg(long, env = "DISK_SHARE_API_ENDPOINT", default_value = DEFAULT_API_ENDPOINT, global = true)]
    api_endpoint: String,

    /// Seconds a listing stays cached.
    #[arg(long, env = "DISK_SHARE_CACHE_TTL", default_value_t = 600, global = true)]
    cache_ttl: u64,

    /// Maximum number of cached listings.
    #[arg(long, env = "DISK_SHARE_CACHE_CAPACITY", default_value_t = DEFAULT_CACHE_CAPACITY, global = true)]
    cache_capacity: usize,

    /// Directory for per-request scratch directories (defaults to the system temp dir).
    #[arg(long, env = "DISK_SHARE_TEMP_DIR", global = true)]
    temp_dir: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "DISK_SHARE_TIMEOUT", global = true)]
    timeout: Option<u64>,

    /// Files fetched at once by a bulk download.
    #[arg(long, env = "DISK_SHARE_CONCURRENCY", default_value_t = 1, global = true)]
    concurrency: usize,

    /// What to do when a subfolder cannot be listed.
    #[arg(long, value_enum, env = "DISK_SHARE_TRAVERSAL", default_value_t = TraversalPolicy::BestEffort, global = true)]
    traversal: TraversalPolicy,

    /// Items requested per folder.
    #[arg(long, env = "DISK_SHARE_PAGE_LIMIT", global = true)]
    page_limit: Option<u32>,
}

impl From<ServiceArgs> for ServiceConfig {
    fn from(args: ServiceArgs) -> Self {
        let defaults = ServiceConfig::default();
        Self {
            api_endpoint: args.api_endpoint,
            cache_ttl: Duration::from_secs(args.cache_ttl),
            cache_capacity: args.cache_capacity,
            temp_root: args.temp_dir.unwrap_or(defaults.temp_root),
            request_timeout: args.timeout.map(Duration::from_secs),
            download_concurrency: args.concurrency,
            traversal: args.traversal,
            page_limit: args.page_limit,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List every file of a share.
    List {
        /// Public share link or key.
        share: String,

        /// Print `{"files": [...]}` or `{"error": "..."}` instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Download one file by its listed download URL.
    Download {
        /// Download URL as printed by `list`.
        token: String,

        /// Local destination path (file or directory).
        #[arg(long, short = 't', default_value = ".")]
        to: PathBuf,
    },

    /// Download several files as one zip archive.
    DownloadMany {
        /// Download URLs as printed by `list`.
        #[arg(required = true)]
        tokens: Vec<String>,

        /// Local destination path (file or directory).
        #[arg(long, short = 't', default_value = ".")]
        to: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level, cli.log_format, cli.log_file.as_deref())
        .context("Failed to initialize logging")?;

    let service = ShareService::new(cli.service.into()).context("Failed to create service")?;

    match cli.command {
        Commands::List { share, json } => match service.list_files(&share).await {
            Ok(files) if json => {
                println!("{}", serde_json::to_string_pretty(&ListingResponse { files })?);
            }
            Ok(files) => {
                if files.is_empty() {
                    println!("No files found.");
                } else {
                    println!("{:<50} DOWNLOAD URL", "PATH");
                    println!("{}", "-".repeat(100));
                    for file in files {
                        println!("{}", file);
                    }
                }
            }
            Err(e) if json => {
                println!("{}", serde_json::to_string_pretty(&ErrorBody::from(&e))?);
                std::process::exit(1);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to list files of share: {}", share));
            }
        },

        Commands::Download { token, to } => {
            println!("Downloading...");
            let payload = service
                .download_single(&token)
                .await
                .context("Failed to download file")?;
            let saved = save_payload(&payload, &to).await?;
            println!("Saved to: {:?}", saved);
        }

        Commands::DownloadMany { tokens, to } => {
            println!("Downloading {} file(s)...", tokens.len());
            let payload = service
                .download_multiple(&tokens)
                .await
                .context("Failed to download files")?;
            let saved = save_payload(&payload, &to).await?;
            println!("Saved to: {:?}", saved);
        }
    }

    Ok(())
}

/// Copy a payload out of its scratch directory before it is removed.
async fn save_payload(payload: &Payload, to: &Path) -> Result<PathBuf> {
    let final_path = if to.is_dir() || to.to_string_lossy().ends_with('/') {
        tokio::fs::create_dir_all(to)
            .await
            .with_context(|| format!("Failed to create directory: {:?}", to))?;
        to.join(payload.file_name())
    } else {
        if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        to.to_path_buf()
    };

    tokio::fs::copy(payload.path(), &final_path)
        .await
        .with_context(|| format!("Failed to write {:?}", final_path))?;

    Ok(final_path)
}
