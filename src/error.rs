//! Error types for asset-gateway
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (download rejections, store failures, config)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes
//!
//! Download rejections are deliberately collapsed to a bare 404 at the HTTP
//! boundary so that neither asset existence nor repository structure leaks to
//! the caller; the detailed variants exist for internal diagnostics only.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for asset-gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for asset-gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "bind_address")
        key: Option<String>,
    },

    /// Asset or container store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A download request was rejected before any bytes were written
    #[error("download rejected: {0}")]
    Rejected(#[from] DownloadRejection),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Reasons a download request is refused.
///
/// All variants map to a single external 404; the distinctions exist so the
/// log line names the offending suffix, id, or filename.
#[derive(Debug, Error)]
pub enum DownloadRejection {
    /// The suffix did not have the `/<id>/<filename>` shape
    #[error("expected suffix to contain an asset id and a filename, instead got: {suffix:?}")]
    MalformedSuffix {
        /// The raw suffix as received
        suffix: String,
    },

    /// No resource exists under the requested id
    #[error("no resource found with the id: {id}")]
    UnknownId {
        /// The id that did not resolve
        id: String,
    },

    /// The id resolved to something that is not a downloadable asset
    #[error("resource with id {id} is not a downloadable asset")]
    NotAnAsset {
        /// The id of the non-asset resource
        id: String,
    },

    /// The filename in the URL does not match the asset's current filename
    #[error("filename from suffix {requested:?} does not match filename from asset {actual:?}")]
    FilenameMismatch {
        /// The filename carried in the request suffix
        requested: String,
        /// The asset's current filename
        actual: String,
    },

    /// The asset has no original rendition to stream
    #[error("no original rendition found for asset: {id}")]
    MissingOriginal {
        /// The id of the asset without an original rendition
        id: String,
    },
}

/// Asset and container store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Lookup could not be performed (backend unavailable, corrupt index, ...)
    #[error("asset lookup failed: {0}")]
    LookupFailed(String),

    /// The store manifest could not be loaded or is invalid
    #[error("invalid store manifest: {0}")]
    Manifest(String),

    /// The requested container does not exist
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    /// A named child does not exist in the container
    #[error("child {name} not found in container {container}")]
    ChildNotFound {
        /// The container that was searched
        container: String,
        /// The child name that was not found
        name: String,
    },

    /// Underlying I/O failure
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// API error response format
///
/// Returned by the JSON endpoints (config, children editor) when an error
/// occurs. The download endpoint never uses this shape: its rejections are a
/// bare 404 with an empty body.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "container_not_found",
///     "message": "container not found: /content/page/par",
///     "details": {
///       "container": "/content/page/par"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "config_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Create a "not found" error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("not_found", format!("{} not found", resource.into()))
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - invalid configuration input
            Error::Config { .. } => 400,

            // 404 Not Found - every download rejection, and missing containers.
            // Lookup failures are also 404: a store error must be
            // indistinguishable from a missing asset.
            Error::Rejected(_) => 404,
            Error::Store(StoreError::ContainerNotFound(_)) => 404,
            Error::Store(StoreError::ChildNotFound { .. }) => 404,
            Error::Store(StoreError::LookupFailed(_)) => 404,

            // 500 Internal Server Error - everything else
            Error::Store(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            // All rejection kinds share one external code by design
            Error::Rejected(_) => "not_found",
            Error::Store(StoreError::ContainerNotFound(_)) => "container_not_found",
            Error::Store(StoreError::ChildNotFound { .. }) => "child_not_found",
            Error::Store(StoreError::LookupFailed(_)) => "not_found",
            Error::Store(_) => "store_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = err.error_code().to_string();
        match &err {
            // Rejections and lookup failures share the generic not-found
            // message: internal detail stays in the logs.
            Error::Rejected(_) | Error::Store(StoreError::LookupFailed(_)) => {
                ApiError::new(code, "resource not found")
            }
            Error::Store(StoreError::ContainerNotFound(container)) => ApiError::with_details(
                code,
                err.to_string(),
                serde_json::json!({ "container": container }),
            ),
            Error::Store(StoreError::ChildNotFound { container, name }) => ApiError::with_details(
                code,
                err.to_string(),
                serde_json::json!({ "container": container, "child": name }),
            ),
            Error::Config { key, .. } => match key {
                Some(key) => ApiError::with_details(
                    code,
                    err.to_string(),
                    serde_json::json!({ "key": key }),
                ),
                None => ApiError::new(code, err.to_string()),
            },
            _ => ApiError::new(code, err.to_string()),
        }
    }
}
