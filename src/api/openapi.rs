//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the asset-gateway REST
//! API using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the asset-gateway REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "asset-gateway REST API",
        version = "0.1.0",
        description = "Serves managed asset downloads behind stable public URLs, exposes component view models, and applies container children edits",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:6780", description = "Local development server")
    ),
    paths(
        // Download
        crate::api::routes::download_file,

        // Children editor
        crate::api::routes::edit_children,

        // Configuration
        crate::api::routes::get_config,
        crate::api::routes::update_config,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        // Config types from config.rs
        crate::config::Config,
        crate::config::EndpointConfig,
        crate::config::ServerConfig,
        crate::config::ConfigUpdate,

        // Store types
        crate::store::ResourceKind,
        crate::store::AssetMetadata,

        // View models
        crate::models::DownloadModel,
        crate::models::VideoModel,
        crate::models::VideoSource,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "download", description = "File download - Stream asset bytes by id and filename"),
        (name = "editor", description = "Children editor - Delete and reorder container children"),
        (name = "config", description = "Configuration - Get and update runtime configuration settings"),
        (name = "system", description = "System endpoints - Health checks and the OpenAPI spec"),
    )
)]
pub struct ApiDoc;
