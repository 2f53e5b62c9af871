//! Configuration types for asset-gateway

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use utoipa::ToSchema;

/// Download endpoint behavior configuration
///
/// Groups the settings that change what the file download endpoint sends.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct EndpointConfig {
    /// Send `Content-Disposition: attachment` so browsers save the file
    /// instead of opening it inline (default: false)
    #[serde(default)]
    pub force_download: bool,
}

/// HTTP server configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:6780)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Main configuration for the gateway
///
/// The configuration is handled as an immutable snapshot: the gateway hands
/// an `Arc<Config>` to each request, and reconfiguration replaces the whole
/// snapshot atomically rather than mutating it in place.
///
/// Sub-config fields are flattened for serialization, so the JSON/TOML format
/// stays flat (no nesting).
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Download endpoint behavior
    #[serde(flatten)]
    pub endpoint: EndpointConfig,

    /// HTTP server settings
    #[serde(flatten)]
    pub server: ServerConfig,
}

impl Config {
    /// Whether successful downloads are sent with an `attachment` disposition
    pub fn force_download(&self) -> bool {
        self.endpoint.force_download
    }
}

/// Partial configuration update applied through the API
///
/// Absent fields leave the current value untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ConfigUpdate {
    /// New value for [`EndpointConfig::force_download`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_download: Option<bool>,
}

impl ConfigUpdate {
    /// Produce a new snapshot from `current` with this update applied
    pub fn apply(&self, current: &Config) -> Config {
        let mut next = current.clone();
        if let Some(force_download) = self.force_download {
            next.endpoint.force_download = force_download;
        }
        next
    }
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6780))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_true() -> bool {
    true
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert!(!config.force_download());
        assert!(config.server.cors_enabled);
        assert!(config.server.swagger_ui);
        assert_eq!(config.server.cors_origins, vec!["*".to_string()]);
    }

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(!config.force_download());
        assert_eq!(
            config.server.bind_address,
            "127.0.0.1:6780".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn serialization_is_flat() {
        let config = Config::default();
        let value = serde_json::to_value(&config).unwrap();
        assert!(value.get("force_download").is_some());
        assert!(value.get("bind_address").is_some());
        assert!(value.get("endpoint").is_none(), "sub-configs must flatten");
    }

    #[test]
    fn config_survives_round_trip() {
        let mut original = Config::default();
        original.endpoint.force_download = true;
        original.server.swagger_ui = false;

        let json = serde_json::to_string(&original).unwrap();
        let restored: Config = serde_json::from_str(&json).unwrap();

        assert!(restored.force_download());
        assert!(!restored.server.swagger_ui);
        assert_eq!(restored.server.bind_address, original.server.bind_address);
    }

    #[test]
    fn update_applies_only_present_fields() {
        let current = Config::default();

        let noop = ConfigUpdate::default().apply(&current);
        assert!(!noop.force_download());

        let update = ConfigUpdate {
            force_download: Some(true),
        };
        let next = update.apply(&current);
        assert!(next.force_download());
        // The original snapshot is untouched
        assert!(!current.force_download());
    }
}
