//! Core gateway service: store handles, config snapshots, container edits.

use crate::config::{Config, ConfigUpdate};
use crate::error::{DownloadRejection, Result};
use crate::store::{AssetStore, ByteSource, ContainerStore};
use crate::suffix::parse_suffix;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

/// A resolved download, ready to stream.
///
/// Dropping `source` releases the store's resources for it, so a handler
/// that builds a response body from the source releases it on every exit
/// path automatically.
pub struct DownloadStream {
    /// Filename as requested in the URL
    pub filename: String,
    /// MIME type of the streamed rendition
    pub mime_type: String,
    /// Content size in bytes; 0 means unknown
    pub size: u64,
    /// The rendition's byte stream
    pub source: ByteSource,
}

/// A children-editor request: names to delete, then the desired final order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChildrenEdit {
    /// Child names to delete before ordering
    pub deleted: Vec<String>,
    /// Child names in the desired final order
    pub ordered: Vec<String>,
}

impl ChildrenEdit {
    /// True when the edit carries no operations at all
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.ordered.is_empty()
    }
}

/// The gateway ties the asset store, the container store, and the current
/// configuration snapshot together.
///
/// Configuration follows snapshot semantics: [`config`](Self::config) clones
/// an `Arc` under a short read lock, and [`update_config`](Self::update_config)
/// replaces the whole snapshot atomically. Request handlers therefore see a
/// consistent config for their entire lifetime without holding any lock.
pub struct AssetGateway {
    store: Arc<dyn AssetStore>,
    containers: Arc<dyn ContainerStore>,
    config: RwLock<Arc<Config>>,
    // One mutex per container path so concurrent edits of the same container
    // are serialized while different containers proceed in parallel.
    edit_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AssetGateway {
    /// Creates a gateway over the given stores and initial configuration.
    pub fn new(
        store: Arc<dyn AssetStore>,
        containers: Arc<dyn ContainerStore>,
        config: Config,
    ) -> Self {
        Self {
            store,
            containers,
            config: RwLock::new(Arc::new(config)),
            edit_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The asset store handle.
    pub fn store(&self) -> &Arc<dyn AssetStore> {
        &self.store
    }

    /// The container store handle.
    pub fn containers(&self) -> &Arc<dyn ContainerStore> {
        &self.containers
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<Config> {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Applies a partial update and atomically installs the new snapshot.
    ///
    /// Returns the snapshot that is now current.
    pub fn update_config(&self, update: &ConfigUpdate) -> Arc<Config> {
        let mut slot = self.config.write().unwrap_or_else(|e| e.into_inner());
        let next = Arc::new(update.apply(&slot));
        *slot = Arc::clone(&next);
        tracing::info!(force_download = next.force_download(), "configuration updated");
        next
    }

    /// Resolves a download suffix and opens the asset's original rendition.
    ///
    /// Every failure returns an error the HTTP layer collapses to a 404:
    /// malformed suffix, unknown id, non-asset resource, filename mismatch,
    /// and missing original rendition are indistinguishable to the caller.
    /// The filename comparison is case-insensitive; a match streams under
    /// the spelling the request carried.
    pub async fn open_download(&self, suffix: &str) -> Result<DownloadStream> {
        let parsed = parse_suffix(suffix)?;

        let asset = self
            .store
            .lookup_by_id(&parsed.id)
            .await?
            .ok_or_else(|| DownloadRejection::UnknownId {
                id: parsed.id.clone(),
            })?;

        if !asset.is_asset() {
            return Err(DownloadRejection::NotAnAsset {
                id: parsed.id.clone(),
            }
            .into());
        }

        if !parsed.filename.eq_ignore_ascii_case(asset.filename()) {
            return Err(DownloadRejection::FilenameMismatch {
                requested: parsed.filename.clone(),
                actual: asset.filename().to_string(),
            }
            .into());
        }

        let original = asset
            .original()
            .ok_or_else(|| DownloadRejection::MissingOriginal {
                id: parsed.id.clone(),
            })?;

        let source = original.open().await?;
        Ok(DownloadStream {
            filename: parsed.filename,
            mime_type: original.mime_type().to_string(),
            size: original.size(),
            source,
        })
    }

    /// Deletes and reorders children of a container.
    ///
    /// Deletions run first. Ordering is a last-to-first pass that pins each
    /// name directly before its successor, so the final child order matches
    /// `edit.ordered`; a named child that does not exist yet is created
    /// before it is ordered. The whole edit holds the container's edit lock,
    /// so concurrent edits of one container cannot interleave.
    pub async fn edit_children(&self, container: &str, edit: &ChildrenEdit) -> Result<()> {
        let guard = self.container_lock(container).await.lock_owned().await;
        let result = self.apply_edit(container, edit).await;
        drop(guard);
        self.release_container_lock(container).await;
        result
    }

    async fn apply_edit(&self, container: &str, edit: &ChildrenEdit) -> Result<()> {
        for name in &edit.deleted {
            if self.containers.has_child(container, name).await? {
                self.containers.delete_child(container, name).await?;
                tracing::debug!(container, child = %name, "deleted child");
            }
        }

        let ordered = &edit.ordered;
        for i in (0..ordered.len()).rev() {
            let name = &ordered[i];
            if !self.containers.has_child(container, name).await? {
                self.containers.create_child(container, name).await?;
            }
            let before = ordered.get(i + 1).map(String::as_str);
            if let Err(e) = self.containers.order_before(container, name, before).await {
                tracing::error!(container, child = %name, error = %e, "could not re-order the items");
            }
        }
        Ok(())
    }

    async fn container_lock(&self, container: &str) -> Arc<Mutex<()>> {
        let mut locks = self.edit_locks.lock().await;
        Arc::clone(
            locks
                .entry(container.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Drops the lock entry once no other task holds or awaits it. Container
    /// paths come from client requests, so the map must not grow with every
    /// path ever posted to.
    async fn release_container_lock(&self, container: &str) {
        let mut locks = self.edit_locks.lock().await;
        if locks
            .get(container)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(container);
        }
    }

    #[cfg(test)]
    pub(crate) async fn edit_lock_count(&self) -> usize {
        self.edit_locks.lock().await.len()
    }

    /// Spawns the API server as a background task.
    pub fn spawn_api_server(self: &Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let gateway = Arc::clone(self);
        let config = gateway.config();
        tokio::spawn(async move { crate::api::start_api_server(gateway, config).await })
    }
}
