//! Configuration management for rolemap
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. TOML file (`--config`, `$ROLEMAP_CONFIG`, or `~/.rolemap/config.toml`)
//! 3. process environment
//!
//! Environment variables:
//! - `CONFLUENT_CLOUD_API_KEY` / `CONFLUENT_CLOUD_API_SECRET`: default key pair
//! - `ROLEMAP_API_BASE_URL`, `ROLEMAP_CLUSTER_REST_URL`
//! - `ENV_<ID>_API_KEY`, `ENV_<ID>_API_SECRET`, `ENV_<ID>_SR_API_KEY`,
//!   `ENV_<ID>_SR_API_SECRET`: per-environment pairs, where `<ID>` is the
//!   environment id without `env-`, upper-cased (`env-qzn062` -> `QZN062`)

use anyhow::{Context, Result};
use rolemap_client::{
    ApiEndpoints, ApiKey, CredentialStore, EnvironmentCredentials, RateLimitPolicy,
    TransportConfig, DEFAULT_API_BASE_URL, DEFAULT_MAX_PAGES,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Management API base URL
    pub api_base_url: String,

    /// Kafka REST endpoint for clusters whose listing has none
    pub cluster_rest_url: Option<String>,

    /// Organization-wide key pair
    pub default_credentials: Option<ApiKey>,

    /// Per-environment key pairs, keyed by environment id
    pub environments: BTreeMap<String, EnvironmentCredentials>,

    pub request_timeout_secs: u64,

    /// Attempts per request when rate limited (429)
    pub max_attempts: u32,

    /// Wait used when a 429 carries no Retry-After
    pub default_retry_after_secs: u64,

    pub max_retry_delay_secs: u64,

    pub max_pages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            cluster_rest_url: None,
            default_credentials: None,
            environments: BTreeMap::new(),
            request_timeout_secs: 30,
            max_attempts: 3,
            default_retry_after_secs: 10,
            max_retry_delay_secs: 60,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl Config {
    /// Load config from the given file, `$ROLEMAP_CONFIG`, or the default
    /// location, then apply the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match std::env::var_os("ROLEMAP_CONFIG") {
                Some(path) => Self::from_file(Path::new(&path))?,
                None => {
                    let path = Self::config_path();
                    if path.exists() {
                        Self::from_file(&path)?
                    } else {
                        Config::default()
                    }
                }
            },
        };

        config.apply_env(std::env::vars());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Overlay variables from `vars` (normally `std::env::vars()`).
    pub fn apply_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut default_key = None;
        let mut default_secret = None;

        for (name, value) in vars {
            match name.as_str() {
                "CONFLUENT_CLOUD_API_KEY" => default_key = Some(value),
                "CONFLUENT_CLOUD_API_SECRET" => default_secret = Some(value),
                "ROLEMAP_API_BASE_URL" => self.api_base_url = value,
                "ROLEMAP_CLUSTER_REST_URL" => self.cluster_rest_url = Some(value),
                _ => {
                    if let Some((environment, credentials)) = environment_variable(&name, value) {
                        self.environments
                            .entry(environment)
                            .or_default()
                            .merge(credentials);
                    }
                }
            }
        }

        if default_key.is_some() || default_secret.is_some() {
            let current = self.default_credentials.take();
            let key = default_key
                .or_else(|| current.as_ref().map(|c| c.key.clone()))
                .unwrap_or_default();
            let secret = default_secret
                .or_else(|| current.as_ref().map(|c| c.secret.clone()))
                .unwrap_or_default();
            self.default_credentials = Some(ApiKey::new(key, secret));
        }
    }

    pub fn credential_store(&self) -> CredentialStore {
        self.environments.iter().fold(
            CredentialStore::new(self.default_credentials.clone()),
            |store, (environment, credentials)| {
                store.with_environment(environment.as_str(), credentials.clone())
            },
        )
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.request_timeout_secs),
            rate_limit: RateLimitPolicy::new(
                self.max_attempts,
                Duration::from_secs(self.default_retry_after_secs),
                Duration::from_secs(self.max_retry_delay_secs),
            ),
        }
    }

    pub fn endpoints(&self) -> ApiEndpoints {
        let endpoints = ApiEndpoints::new(self.api_base_url.as_str());
        match &self.cluster_rest_url {
            Some(url) => endpoints.with_cluster_rest_url(url.as_str()),
            None => endpoints,
        }
    }

    /// Get config file path (~/.rolemap/config.toml)
    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".rolemap").join("config.toml")
    }
}

/// Map `ENV_<ID>_{API_KEY,API_SECRET,SR_API_KEY,SR_API_SECRET}` to
/// `env-<id>` and the half it sets.
fn environment_variable(name: &str, value: String) -> Option<(String, EnvironmentCredentials)> {
    let rest = name.strip_prefix("ENV_")?;
    let mut credentials = EnvironmentCredentials::default();

    // SR suffixes first: `_SR_API_KEY` also ends with `_API_KEY`.
    let id = if let Some(id) = rest.strip_suffix("_SR_API_KEY") {
        credentials.sr_api_key = Some(value);
        id
    } else if let Some(id) = rest.strip_suffix("_SR_API_SECRET") {
        credentials.sr_api_secret = Some(value);
        id
    } else if let Some(id) = rest.strip_suffix("_API_KEY") {
        credentials.api_key = Some(value);
        id
    } else if let Some(id) = rest.strip_suffix("_API_SECRET") {
        credentials.api_secret = Some(value);
        id
    } else {
        return None;
    };

    if id.is_empty() {
        return None;
    }
    Some((format!("env-{}", id.to_lowercase()), credentials))
}
