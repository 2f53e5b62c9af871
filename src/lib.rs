//! # asset-gateway
//!
//! Backend library for serving managed assets over HTTP behind stable
//! public URLs.
//!
//! The gateway hides the repository layout from clients: the only visible
//! coordinates of an asset are its opaque id and its filename, combined into
//! a `/bin/download.file/<id>/<filename>` URL. Around that core it provides
//! view-model assemblers for download and video page components, a children
//! editor for ordered containers, and a small REST management surface.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Opaque by default** - Download failures are a uniform empty 404 so
//!   nothing about the repository can be probed from outside
//! - **Snapshot configuration** - Requests see one immutable config for
//!   their whole lifetime; updates swap the snapshot atomically
//!
//! ## Quick Start
//!
//! ```no_run
//! use asset_gateway::store::memory::{MemoryAsset, MemoryAssetStore, MemoryContainerStore};
//! use asset_gateway::{AssetGateway, Config};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let assets = Arc::new(MemoryAssetStore::new());
//!     assets.insert(MemoryAsset::new(
//!         "8d7e96d4-501a-4ade-93d5-a5956b13a5df",
//!         "Download_Test_PDF.pdf",
//!         "application/pdf",
//!         std::fs::read("Download_Test_PDF.pdf")?,
//!     ));
//!
//!     let gateway = Arc::new(AssetGateway::new(
//!         assets,
//!         Arc::new(MemoryContainerStore::new()),
//!         Config::default(),
//!     ));
//!
//!     // Serve the HTTP endpoints until a termination signal arrives
//!     asset_gateway::run_with_shutdown(gateway).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Content-Disposition formatting
pub mod disposition;
/// Error types
pub mod error;
/// Core gateway service
pub mod gateway;
/// Component view models
pub mod models;
/// Asset and container store contracts and implementations
pub mod store;
/// Download URL grammar
pub mod suffix;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::{Config, ConfigUpdate, EndpointConfig, ServerConfig};
pub use error::{
    ApiError, DownloadRejection, Error, ErrorDetail, Result, StoreError, ToHttpStatus,
};
pub use gateway::{AssetGateway, ChildrenEdit, DownloadStream};
pub use models::{
    ComponentStyle, DownloadModel, DownloadProps, DownloadSource, UploadedFile, VideoModel,
    VideoProps, VideoSource,
};
pub use store::{AssetHandle, AssetMetadata, AssetStore, ContainerStore, Rendition, ResourceKind};
pub use suffix::{DownloadSuffix, download_url, parse_suffix};

/// Helper function to run the gateway's API server with graceful signal
/// handling.
///
/// Spawns the API server, waits for a termination signal, and stops the
/// server.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
pub async fn run_with_shutdown(gateway: std::sync::Arc<AssetGateway>) -> Result<()> {
    let server = gateway.spawn_api_server();
    wait_for_signal().await;
    server.abort();
    tracing::info!("shut down");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
