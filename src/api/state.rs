//! Application state for the API server

use crate::AssetGateway;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the gateway instance. Handlers take per-request configuration
/// snapshots from the gateway rather than caching one here, so a config
/// update is visible to the next request without restarting the server.
#[derive(Clone)]
pub struct AppState {
    /// The main AssetGateway instance
    pub gateway: Arc<AssetGateway>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(gateway: Arc<AssetGateway>) -> Self {
        Self { gateway }
    }
}
