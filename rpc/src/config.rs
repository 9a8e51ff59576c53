//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::RpcError;

/// Configuration for the continua service.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Secrets (the email provider
/// API key) are never part of the file; they come from the environment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Port to listen on for HTTP requests.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Data directory for contact storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Public base URL of the site; verification links point here.
    #[serde(default = "default_site_base_url")]
    pub site_base_url: String,

    /// Directory holding the downloadable book PDFs.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// From-address used on verification emails.
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./continua_data")
}

fn default_site_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("./books")
}

fn default_from_address() -> String {
    "Continua Press <verify@continua.press>".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, RpcError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RpcError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, RpcError> {
        toml::from_str(s).map_err(|e| RpcError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("ServiceConfig is always serializable to TOML")
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            data_dir: default_data_dir(),
            site_base_url: default_site_base_url(),
            assets_dir: default_assets_dir(),
            from_address: default_from_address(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
