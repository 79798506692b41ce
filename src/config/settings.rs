use std::env;

use anyhow::{anyhow, Result};
use serde::Deserialize;

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub response_shape: ResponseShape,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: String,
}

/// Upstream circulation API (auth + patron-status endpoints).
///
/// Credentials never live in the config file; the file only names the
/// environment variables they are read from.
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_client_id_env")]
    pub client_id_env: String,
    #[serde(default = "default_client_secret_env")]
    pub client_secret_env: String,
}

impl UpstreamConfig {
    /// Resolve the client-credentials pair from the environment.
    pub fn credentials(&self) -> Result<(String, String)> {
        let client_id = env::var(&self.client_id_env)
            .map_err(|_| anyhow!("environment variable '{}' is not set", self.client_id_env))?;
        let client_secret = env::var(&self.client_secret_env)
            .map_err(|_| anyhow!("environment variable '{}' is not set", self.client_secret_env))?;
        Ok((client_id, client_secret))
    }
}

/// Where the homeroom -> district-ID table comes from.
/// Exactly one of `path` (JSON file) or `inline` must be set.
#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryConfig {
    pub path: Option<String>,
    pub inline: Option<std::collections::BTreeMap<String, Vec<String>>>,
}

/// How per-student results are rendered in the homeroom response.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    /// Computed allowance records; upstream failures become safe defaults.
    #[default]
    Allowance,
    /// Raw upstream bodies; upstream failures become `{error}` sentinels.
    Passthrough,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_client_id_env() -> String {
    "CLIENT_ID".to_string()
}

fn default_client_secret_env() -> String {
    "CLIENT_SECRET".to_string()
}
