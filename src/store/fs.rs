//! Filesystem-backed asset store.
//!
//! Assets live as plain files under a root directory, described by a
//! `manifest.json` at the root. The manifest is the id index: it maps each
//! opaque id to relative rendition paths, MIME types, and metadata. The
//! manifest is loaded once at startup; rendition bytes are streamed from
//! disk on demand.
//!
//! Manifest shape:
//!
//! ```json
//! {
//!   "assets": [
//!     {
//!       "id": "8d7e96d4-501a-4ade-93d5-a5956b13a5df",
//!       "filename": "Download_Test_PDF.pdf",
//!       "mime_type": "application/pdf",
//!       "kind": "asset",
//!       "last_modified": "2024-05-01T12:00:00Z",
//!       "metadata": { "title": "Test PDF", "size_bytes": 1024 },
//!       "renditions": [
//!         { "name": "original", "path": "documents/Download_Test_PDF.pdf",
//!           "mime_type": "application/pdf" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::error::StoreError;
use crate::store::{
    AssetHandle, AssetMetadata, AssetStore, ByteSource, Rendition, ResourceKind,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Manifest file name expected at the store root
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    assets: Vec<ManifestAsset>,
}

#[derive(Debug, Deserialize)]
struct ManifestAsset {
    id: String,
    filename: String,
    mime_type: String,
    #[serde(default)]
    kind: ResourceKind,
    #[serde(default)]
    last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    metadata: AssetMetadata,
    #[serde(default)]
    renditions: Vec<ManifestRendition>,
}

#[derive(Debug, Deserialize)]
struct ManifestRendition {
    name: String,
    path: PathBuf,
    mime_type: String,
}

/// Rendition streamed from a file on disk.
pub struct FsRendition {
    name: String,
    mime_type: String,
    absolute: PathBuf,
    path: String,
    size: u64,
}

#[async_trait]
impl Rendition for FsRendition {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn path(&self) -> &str {
        &self.path
    }

    async fn open(&self) -> std::io::Result<ByteSource> {
        let file = tokio::fs::File::open(&self.absolute).await?;
        Ok(Box::new(file))
    }
}

/// Asset entry resolved from the manifest.
pub struct FsAsset {
    id: String,
    filename: String,
    mime_type: String,
    kind: ResourceKind,
    path: String,
    last_modified_ms: Option<i64>,
    metadata: AssetMetadata,
    renditions: Vec<Arc<FsRendition>>,
}

impl AssetHandle for FsAsset {
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
        self.renditions
            .iter()
            .find(|r| r.name() == crate::store::ORIGINAL_RENDITION_NAME)
            .cloned()
            .map(|r| r as Arc<dyn Rendition>)
    }

    fn renditions(&self) -> Vec<Arc<dyn Rendition>> {
        self.renditions
            .iter()
            .map(|r| Arc::clone(r) as Arc<dyn Rendition>)
            .collect()
    }
}

/// [`AssetStore`] over a manifest-described directory tree.
pub struct FsAssetStore {
    assets: HashMap<String, Arc<FsAsset>>,
}

impl FsAssetStore {
    /// Loads the manifest under `root` and stats every rendition file.
    ///
    /// Renditions whose file is missing are skipped with a warning rather
    /// than failing the whole store; a duplicate asset id is an error.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref();
        let manifest_path = root.join(MANIFEST_FILE);
        let raw = tokio::fs::read(&manifest_path).await.map_err(|e| {
            StoreError::Manifest(format!("cannot read {}: {e}", manifest_path.display()))
        })?;
        let manifest: Manifest = serde_json::from_slice(&raw)
            .map_err(|e| StoreError::Manifest(format!("invalid manifest: {e}")))?;

        let mut assets = HashMap::new();
        for entry in manifest.assets {
            let mut renditions = Vec::new();
            for rendition in entry.renditions {
                let absolute = root.join(&rendition.path);
                let size = match tokio::fs::metadata(&absolute).await {
                    Ok(meta) => meta.len(),
                    Err(e) => {
                        tracing::warn!(
                            asset_id = %entry.id,
                            rendition = %rendition.name,
                            path = %absolute.display(),
                            error = %e,
                            "skipping rendition with unreadable file"
                        );
                        continue;
                    }
                };
                renditions.push(Arc::new(FsRendition {
                    name: rendition.name,
                    mime_type: rendition.mime_type,
                    path: format!("/{}", rendition.path.display()),
                    absolute,
                    size,
                }));
            }

            let asset = FsAsset {
                path: format!("/{}", entry.filename),
                last_modified_ms: entry.last_modified.map(|t| t.timestamp_millis()),
                id: entry.id,
                filename: entry.filename,
                mime_type: entry.mime_type,
                kind: entry.kind,
                metadata: entry.metadata,
                renditions,
            };
            if assets.insert(asset.id.clone(), Arc::new(asset)).is_some() {
                return Err(StoreError::Manifest(
                    "duplicate asset id in manifest".to_string(),
                ));
            }
        }

        tracing::info!(assets = assets.len(), root = %root.display(), "asset store loaded");
        Ok(Self { assets })
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn lookup_by_id(&self, id: &str) -> Result<Option<Arc<dyn AssetHandle>>, StoreError> {
        Ok(self
            .assets
            .get(id)
            .cloned()
            .map(|a| a as Arc<dyn AssetHandle>))
    }
}
