//! In-memory store implementations for tests and embedding.

use crate::error::StoreError;
use crate::store::{
    AssetHandle, AssetMetadata, AssetStore, ByteSource, ContainerStore, ORIGINAL_RENDITION_NAME,
    Rendition, ResourceKind,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Cursor;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// A rendition held entirely in memory.
///
/// Every [`open`](Rendition::open) hands out an independent reader and bumps
/// an open-stream counter that the reader decrements on drop, which lets
/// tests assert that the endpoint releases its byte source on every path.
pub struct MemoryRendition {
    name: String,
    mime_type: String,
    path: String,
    content: Vec<u8>,
    open_streams: Arc<AtomicUsize>,
}

impl MemoryRendition {
    /// Creates a rendition with the given name, MIME type, and content.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        let name = name.into();
        Self {
            path: format!("/renditions/{name}"),
            name,
            mime_type: mime_type.into(),
            content,
            open_streams: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of byte sources opened from this rendition and not yet dropped.
    pub fn open_stream_count(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    /// The raw content bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

#[async_trait]
impl Rendition for MemoryRendition {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size(&self) -> u64 {
        self.content.len() as u64
    }

    fn path(&self) -> &str {
        &self.path
    }

    async fn open(&self) -> std::io::Result<ByteSource> {
        self.open_streams.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TrackedReader {
            inner: Cursor::new(self.content.clone()),
            open_streams: Arc::clone(&self.open_streams),
        }))
    }
}

/// Reader that decrements the rendition's open-stream counter on drop.
struct TrackedReader {
    inner: Cursor<Vec<u8>>,
    open_streams: Arc<AtomicUsize>,
}

impl AsyncRead for TrackedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl Drop for TrackedReader {
    fn drop(&mut self) {
        self.open_streams.fetch_sub(1, Ordering::SeqCst);
    }
}

/// An asset held entirely in memory.
pub struct MemoryAsset {
    id: String,
    filename: String,
    mime_type: String,
    path: String,
    kind: ResourceKind,
    last_modified_ms: Option<i64>,
    metadata: AssetMetadata,
    renditions: Vec<Arc<MemoryRendition>>,
}

impl MemoryAsset {
    /// Creates an asset whose original rendition holds `content`.
    pub fn new(
        id: impl Into<String>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        let filename = filename.into();
        let mime_type = mime_type.into();
        Self {
            id: id.into(),
            path: format!("/content/assets/{filename}"),
            filename,
            kind: ResourceKind::Asset,
            last_modified_ms: None,
            metadata: AssetMetadata::default(),
            renditions: vec![Arc::new(MemoryRendition::new(
                ORIGINAL_RENDITION_NAME,
                mime_type.clone(),
                content,
            ))],
            mime_type,
        }
    }

    /// Creates an asset that has no renditions at all.
    pub fn without_original(
        id: impl Into<String>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        let mut asset = Self::new(id, filename, mime_type, Vec::new());
        asset.renditions.clear();
        asset
    }

    /// Creates a non-asset resource (e.g. a folder) under the given id.
    pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut asset = Self::new(id, name, "application/octet-stream", Vec::new());
        asset.renditions.clear();
        asset.kind = ResourceKind::Folder;
        asset
    }

    /// Sets descriptive metadata.
    pub fn with_metadata(mut self, metadata: AssetMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Sets the last-modified timestamp in epoch milliseconds.
    pub fn with_last_modified_ms(mut self, ms: i64) -> Self {
        self.last_modified_ms = Some(ms);
        self
    }

    /// Adds a non-original rendition.
    pub fn with_rendition(
        mut self,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        self.renditions
            .push(Arc::new(MemoryRendition::new(name, mime_type, content)));
        self
    }

    /// Concrete accessor for the original rendition, for test assertions.
    pub fn original_rendition(&self) -> Option<Arc<MemoryRendition>> {
        self.renditions
            .iter()
            .find(|r| r.name() == ORIGINAL_RENDITION_NAME)
            .cloned()
    }
}

impl AssetHandle for MemoryAsset {
    fn id(&self) -> &str {
        &self.id
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn last_modified_ms(&self) -> Option<i64> {
        self.last_modified_ms
    }

    fn metadata(&self) -> &AssetMetadata {
        &self.metadata
    }

    fn original(&self) -> Option<Arc<dyn Rendition>> {
        self.original_rendition().map(|r| r as Arc<dyn Rendition>)
    }

    fn renditions(&self) -> Vec<Arc<dyn Rendition>> {
        self.renditions
            .iter()
            .map(|r| Arc::clone(r) as Arc<dyn Rendition>)
            .collect()
    }
}

/// In-memory [`AssetStore`] keyed by asset id.
#[derive(Default)]
pub struct MemoryAssetStore {
    assets: Mutex<HashMap<String, Arc<MemoryAsset>>>,
    fail_lookups: AtomicBool,
}

impl MemoryAssetStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an asset and returns the shared handle.
    pub fn insert(&self, asset: MemoryAsset) -> Arc<MemoryAsset> {
        let asset = Arc::new(asset);
        let mut assets = self.assets.lock().unwrap_or_else(|e| e.into_inner());
        assets.insert(asset.id.clone(), Arc::clone(&asset));
        asset
    }

    /// When set, every lookup fails. Used to exercise the requirement that
    /// lookup errors are externally indistinguishable from not-found.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn lookup_by_id(&self, id: &str) -> Result<Option<Arc<dyn AssetHandle>>, StoreError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(StoreError::LookupFailed("injected lookup failure".into()));
        }
        let assets = self.assets.lock().unwrap_or_else(|e| e.into_inner());
        Ok(assets
            .get(id)
            .cloned()
            .map(|a| a as Arc<dyn AssetHandle>))
    }
}

/// In-memory [`ContainerStore`]: ordered child-name lists per container path.
#[derive(Default)]
pub struct MemoryContainerStore {
    containers: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryContainerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a container with the given ordered children.
    pub fn insert_container(&self, path: impl Into<String>, children: Vec<String>) {
        let mut containers = self.containers.lock().unwrap_or_else(|e| e.into_inner());
        containers.insert(path.into(), children);
    }
}

#[async_trait]
impl ContainerStore for MemoryContainerStore {
    async fn children(&self, container: &str) -> Result<Vec<String>, StoreError> {
        let containers = self.containers.lock().unwrap_or_else(|e| e.into_inner());
        containers
            .get(container)
            .cloned()
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))
    }

    async fn has_child(&self, container: &str, name: &str) -> Result<bool, StoreError> {
        Ok(self.children(container).await?.iter().any(|c| c == name))
    }

    async fn create_child(&self, container: &str, name: &str) -> Result<(), StoreError> {
        let mut containers = self.containers.lock().unwrap_or_else(|e| e.into_inner());
        let children = containers
            .get_mut(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;
        children.push(name.to_string());
        Ok(())
    }

    async fn delete_child(&self, container: &str, name: &str) -> Result<(), StoreError> {
        let mut containers = self.containers.lock().unwrap_or_else(|e| e.into_inner());
        let children = containers
            .get_mut(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;
        children.retain(|c| c != name);
        Ok(())
    }

    async fn order_before(
        &self,
        container: &str,
        name: &str,
        before: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut containers = self.containers.lock().unwrap_or_else(|e| e.into_inner());
        let children = containers
            .get_mut(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;

        let position = children.iter().position(|c| c == name).ok_or_else(|| {
            StoreError::ChildNotFound {
                container: container.to_string(),
                name: name.to_string(),
            }
        })?;
        let child = children.remove(position);

        match before {
            None => children.push(child),
            Some(before) => {
                let target = children.iter().position(|c| c == before).ok_or_else(|| {
                    StoreError::ChildNotFound {
                        container: container.to_string(),
                        name: before.to_string(),
                    }
                })?;
                children.insert(target, child);
            }
        }
        Ok(())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn lookup_finds_inserted_asset() {
        let store = MemoryAssetStore::new();
        store.insert(MemoryAsset::new(
            "id-1",
            "report.pdf",
            "application/pdf",
            b"%PDF-1.4".to_vec(),
        ));

        let asset = store.lookup_by_id("id-1").await.unwrap().unwrap();
        assert_eq!(asset.filename(), "report.pdf");
        assert!(asset.is_asset());
        assert_eq!(asset.original().unwrap().size(), 8);

        assert!(store.lookup_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn injected_lookup_failure_surfaces_as_error() {
        let store = MemoryAssetStore::new();
        store.fail_lookups(true);
        assert!(store.lookup_by_id("anything").await.is_err());
    }

    #[tokio::test]
    async fn open_streams_are_independent_and_released_on_drop() {
        let store = MemoryAssetStore::new();
        let asset = store.insert(MemoryAsset::new(
            "id-1",
            "a.txt",
            "text/plain",
            b"hello".to_vec(),
        ));
        let rendition = asset.original_rendition().unwrap();

        let mut first = rendition.open().await.unwrap();
        let second = rendition.open().await.unwrap();
        assert_eq!(rendition.open_stream_count(), 2);

        let mut buf = Vec::new();
        first.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"hello");

        drop(first);
        drop(second);
        assert_eq!(rendition.open_stream_count(), 0);
    }

    #[tokio::test]
    async fn folder_resources_are_not_assets() {
        let store = MemoryAssetStore::new();
        store.insert(MemoryAsset::folder("folder-1", "documents"));
        let folder = store.lookup_by_id("folder-1").await.unwrap().unwrap();
        assert!(!folder.is_asset());
        assert!(folder.original().is_none());
    }

    #[tokio::test]
    async fn image_preview_skips_the_original() {
        let asset = MemoryAsset::new("v", "clip.mp4", "video/mp4", b"mp4".to_vec())
            .with_rendition("thumbnail.png", "image/png", b"png".to_vec());
        let preview = asset.image_preview().expect("preview should exist");
        assert_eq!(preview.mime_type(), "image/png");

        let plain = MemoryAsset::new("p", "doc.pdf", "application/pdf", b"pdf".to_vec());
        assert!(plain.image_preview().is_none());
    }

    #[tokio::test]
    async fn container_ordering_operations() {
        let store = MemoryContainerStore::new();
        store.insert_container(
            "/content/par",
            vec!["a".into(), "b".into(), "c".into()],
        );

        store.order_before("/content/par", "c", Some("a")).await.unwrap();
        assert_eq!(
            store.children("/content/par").await.unwrap(),
            vec!["c", "a", "b"]
        );

        store.order_before("/content/par", "c", None).await.unwrap();
        assert_eq!(
            store.children("/content/par").await.unwrap(),
            vec!["a", "b", "c"]
        );

        store.delete_child("/content/par", "b").await.unwrap();
        store.create_child("/content/par", "d").await.unwrap();
        assert_eq!(
            store.children("/content/par").await.unwrap(),
            vec!["a", "c", "d"]
        );
    }

    #[tokio::test]
    async fn unknown_container_is_an_error() {
        let store = MemoryContainerStore::new();
        assert!(matches!(
            store.children("/nope").await,
            Err(StoreError::ContainerNotFound(_))
        ));
    }
}
