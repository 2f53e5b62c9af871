//! REST API server module
//!
//! Exposes the file download endpoint, the container children editor, and an
//! OpenAPI 3.1 compliant management surface for configuration and health.

use crate::{AssetGateway, Config, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## File Download
/// - `GET /bin/download.file/*suffix` - Stream an asset's original bytes;
///   the suffix is `/<id>/<filename>` and every failure is an empty 404
/// - `GET /bin/download.file` - Missing suffix, always an empty 404
///
/// ## Children Editor
/// - `POST /<container>.childreneditor.html` - Apply a form-encoded children
///   edit to the container at the request path
///
/// ## Configuration
/// - `GET /config` - Get current config
/// - `PATCH /config` - Update config
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_router(gateway: Arc<AssetGateway>, config: Arc<Config>) -> Router {
    let state = AppState::new(gateway);

    // Static routes win over the catch-all, so the editor only sees paths
    // that no other endpoint claims.
    let router = Router::new()
        // File Download
        .route("/bin/download.file", get(routes::download_missing_suffix))
        .route("/bin/download.file/*suffix", get(routes::download_file))
        // Children Editor; non-POST methods under the catch-all are plain 404s
        .route(
            "/*path",
            post(routes::edit_children).fallback(routes::fallback_not_found),
        )
        // Configuration
        .route("/config", get(routes::get_config))
        .route("/config", patch(routes::update_config))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    // Merge Swagger UI routes if enabled in config (before applying state).
    // The UI gets its own spec url; /openapi.json stays a plain route above.
    let router = if config.server.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    // Add state to all routes
    let router = router.with_state(state);

    // Request tracing runs innermost so the CORS preflight short-circuit
    // stays outside of it
    let router = router.layer(TraceLayer::new_for_http());

    // Apply CORS middleware if enabled in config
    if config.server.cors_enabled {
        let cors = build_cors_layer(&config.server.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// # Arguments
///
/// * `origins` - List of allowed origins (supports "*" for any origin)
///
/// # Returns
///
/// A configured CorsLayer that allows the specified origins, all methods,
/// and all headers for cross-origin requests.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    // Check if "*" (all origins) is in the list
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        // Allow all origins (default for local development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Allow specific origins
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// This function creates a TCP listener, binds it to the configured address,
/// and starts serving the API router. It runs until the server is shut down.
///
/// # Example
///
/// ```no_run
/// use asset_gateway::store::memory::{MemoryAssetStore, MemoryContainerStore};
/// use asset_gateway::{AssetGateway, Config};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let gateway = Arc::new(AssetGateway::new(
///     Arc::new(MemoryAssetStore::new()),
///     Arc::new(MemoryContainerStore::new()),
///     config,
/// ));
///
/// // Start API server (blocks until shutdown)
/// let config = gateway.config();
/// asset_gateway::api::start_api_server(gateway, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(gateway: Arc<AssetGateway>, config: Arc<Config>) -> Result<()> {
    let bind_address = config.server.bind_address;

    tracing::info!(
        address = %bind_address,
        "Starting API server"
    );

    // Create the router with all routes
    let app = create_router(gateway, config);

    // Bind TCP listener to the configured address
    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "API server listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
