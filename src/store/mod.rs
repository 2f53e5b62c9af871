//! Store contracts consumed by the endpoints and view models.
//!
//! The download endpoint depends on a deliberately small capability set:
//! look up an asset by its opaque id, read its attributes, and open the
//! original rendition's byte stream. The contracts are traits so the
//! endpoint can be exercised against an in-memory store without a real
//! repository behind it.
//!
//! Two implementations ship with the crate:
//! - [`memory::MemoryAssetStore`] / [`memory::MemoryContainerStore`] for
//!   tests and embedding
//! - [`fs::FsAssetStore`] backed by a JSON manifest and files on disk

use crate::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::io::AsyncRead;
use utoipa::ToSchema;

pub mod fs;
pub mod memory;

/// Name of the rendition holding the unmodified source bytes
pub const ORIGINAL_RENDITION_NAME: &str = "original";

/// A readable byte source for a rendition's content.
///
/// Ownership doubles as the release contract: dropping the source releases
/// whatever the store holds open for it, so handing it to a response body
/// guarantees release on every exit path, including mid-copy failures.
pub type ByteSource = Box<dyn AsyncRead + Send + Unpin>;

/// What kind of resource an id resolves to.
///
/// Only assets are downloadable; anything else is rejected by the endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A stored binary with renditions
    #[default]
    Asset,
    /// A folder or other non-asset repository node
    Folder,
}

/// Optional descriptive metadata attached to an asset.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AssetMetadata {
    /// Declared title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Declared description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Declared format (e.g. "application/pdf")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Raw size in bytes, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// A specific encoding of an asset.
///
/// The `original` rendition holds the unmodified source bytes; additional
/// renditions carry previews or transcodes.
#[async_trait]
pub trait Rendition: Send + Sync {
    /// Rendition name, `original` for the source bytes
    fn name(&self) -> &str;

    /// MIME type of this rendition's content
    fn mime_type(&self) -> &str;

    /// Content size in bytes; 0 means unknown
    fn size(&self) -> u64;

    /// Storage path of this rendition. Private to the store and its
    /// consumers; the download endpoint never exposes it to a client.
    fn path(&self) -> &str;

    /// Opens a fresh byte source over this rendition's content.
    ///
    /// Concurrent opens are independent: two requests for the same asset
    /// stream from separate sources.
    async fn open(&self) -> std::io::Result<ByteSource>;
}

/// Read-only handle to a stored asset.
pub trait AssetHandle: Send + Sync {
    /// Stable opaque identifier, unique within the store
    fn id(&self) -> &str;

    /// Filename: the last path segment of the asset's storage location
    fn filename(&self) -> &str;

    /// MIME type of the asset
    fn mime_type(&self) -> &str;

    /// Whether the resolved resource is a downloadable asset
    fn is_asset(&self) -> bool {
        self.kind() == ResourceKind::Asset
    }

    /// Resource kind of the resolved node
    fn kind(&self) -> ResourceKind;

    /// Storage path, private to the store
    fn path(&self) -> &str;

    /// Last-modified timestamp in milliseconds since the epoch
    fn last_modified_ms(&self) -> Option<i64>;

    /// Descriptive metadata
    fn metadata(&self) -> &AssetMetadata;

    /// The original rendition, when present
    fn original(&self) -> Option<Arc<dyn Rendition>>;

    /// All renditions of this asset, original included
    fn renditions(&self) -> Vec<Arc<dyn Rendition>>;

    /// A still-image rendition suitable as a poster/preview, when one exists
    /// that is distinct from the original.
    fn image_preview(&self) -> Option<Arc<dyn Rendition>> {
        let original_path = self.original().map(|o| o.path().to_string());
        self.renditions().into_iter().find(|r| {
            r.mime_type().starts_with("image/") && Some(r.path()) != original_path.as_deref()
        })
    }
}

/// Resolves opaque identifiers to asset handles.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Returns the resource whose identifier equals `id`, or `None` when no
    /// such resource exists.
    ///
    /// Callers on the download path must treat an `Err` exactly like
    /// `Ok(None)`: lookup failures collapse to not-found externally.
    async fn lookup_by_id(&self, id: &str) -> Result<Option<Arc<dyn AssetHandle>>, StoreError>;
}

/// Ordered named children under addressable containers.
///
/// Consumed by the children editor endpoint. Individual operations are
/// atomic; whole edits are serialized per container by the gateway.
#[async_trait]
pub trait ContainerStore: Send + Sync {
    /// Child names of `container` in their current order
    async fn children(&self, container: &str) -> Result<Vec<String>, StoreError>;

    /// Whether `container` has a child called `name`
    async fn has_child(&self, container: &str, name: &str) -> Result<bool, StoreError>;

    /// Creates an empty child `name` at the end of `container`
    async fn create_child(&self, container: &str, name: &str) -> Result<(), StoreError>;

    /// Deletes child `name` from `container`
    async fn delete_child(&self, container: &str, name: &str) -> Result<(), StoreError>;

    /// Moves child `name` directly before `before`, or to the end of the
    /// container when `before` is `None`.
    async fn order_before(
        &self,
        container: &str,
        name: &str,
        before: Option<&str>,
    ) -> Result<(), StoreError>;
}
