//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (API keys) are referenced by env-var name in the config and
//! resolved at runtime via `std::env::var`; a missing variable leaves the
//! integration in mock mode rather than failing startup.

use anyhow::{Context, Result};
use secrecy::Secret;
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub integrations: IntegrationsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    pub name: String,
    pub cycle_interval_secs: u64,
    /// Predicted score at which an opportunity is traded.
    pub score_threshold: f64,
    /// Predicted score at which a voice alert is dispatched.
    pub anomaly_threshold: f64,
    pub crypto_watchlist: Vec<String>,
    pub stock_watchlist: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub state_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IntegrationsConfig {
    pub brokerage: BrokerageConfig,
    pub search: VendorConfig,
    pub datasync: DatasyncConfig,
    pub vision: VendorConfig,
    pub graph: GraphConfig,
    pub predictor: VendorConfig,
    pub navigator: VendorConfig,
    pub ledger: VendorConfig,
    pub voice: VendorConfig,
    pub context: VendorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrokerageConfig {
    pub api_key_env: String,
    /// Base64-encoded Ed25519 seed for request signing.
    pub private_key_env: String,
    pub base_url: String,
}

/// Generic vendor section: an API-key env-var name and a base URL.
#[derive(Debug, Deserialize, Clone)]
pub struct VendorConfig {
    pub api_key_env: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasyncConfig {
    pub api_key_env: String,
    pub base_url: String,
    #[serde(default)]
    pub workspace_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub username: String,
    pub password_env: String,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }

    /// Resolve a secret env var, returning None when unset or empty.
    /// Integrations fall back to mock mode in that case.
    pub fn resolve_secret(env_name: &str) -> Option<Secret<String>> {
        match std::env::var(env_name) {
            Ok(v) if !v.trim().is_empty() => Some(Secret::new(v)),
            _ => None,
        }
    }
}
