//! Gateway configuration schema.
//!
//! Loaded from a JSON file; every field has a default so an absent file
//! yields a runnable configuration. Unknown fields are silently ignored
//! for forward compatibility.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8019
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".into()]
}

fn default_handlers_dir() -> PathBuf {
    PathBuf::from("handlers")
}

fn default_base_url() -> String {
    "http://localhost:11434".into()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file was not valid JSON for the schema.
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Connection settings for the generation backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendSettings {
    /// Base URL of the backend HTTP API.
    #[serde(default = "default_base_url", alias = "baseUrl")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs", alias = "timeoutSecs")]
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Root configuration for the gateway process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayConfig {
    /// Address to bind the HTTP server on.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the HTTP server on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. An empty list means permissive CORS.
    #[serde(default = "default_cors_origins", alias = "corsOrigins")]
    pub cors_origins: Vec<String>,

    /// Root directory scanned for handler manifests at startup.
    #[serde(default = "default_handlers_dir", alias = "handlersDir")]
    pub handlers_dir: PathBuf,

    /// Generation backend connection settings.
    #[serde(default)]
    pub backend: BackendSettings,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            handlers_dir: default_handlers_dir(),
            backend: BackendSettings::default(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Load configuration, falling back to defaults when the file does not
    /// exist. A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
