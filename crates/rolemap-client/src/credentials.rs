//! API key pairs and per-request credential selection.
//!
//! The store is built once from configuration and handed to the transport at
//! construction. Every request declares a [`CredentialScope`]; the store maps
//! it to a key pair:
//!
//! | scope | pair used |
//! |---|---|
//! | `Organization` | default |
//! | `Cluster(env)` | env `api_key`/`api_secret`, else default |
//! | `SchemaRegistry(env)` | env `sr_api_key`/`sr_api_secret`, else default |
//!
//! A pair counts only when both halves are non-empty.

use rolemap_core::EnvironmentId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// An API key and its secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub key: String,
    pub secret: String,
}

impl ApiKey {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Build a pair from two optional halves, requiring both to be non-empty.
    pub fn from_parts(key: Option<&str>, secret: Option<&str>) -> Option<Self> {
        match (key, secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some(Self::new(key, secret))
            }
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty()
    }
}

// Secrets stay out of logs.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("key", &self.key)
            .field("secret", &"***")
            .finish()
    }
}

/// Key pairs configured for one environment. Each half may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentCredentials {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub sr_api_key: Option<String>,
    pub sr_api_secret: Option<String>,
}

impl EnvironmentCredentials {
    pub fn cluster(&self) -> Option<ApiKey> {
        ApiKey::from_parts(self.api_key.as_deref(), self.api_secret.as_deref())
    }

    pub fn schema_registry(&self) -> Option<ApiKey> {
        ApiKey::from_parts(self.sr_api_key.as_deref(), self.sr_api_secret.as_deref())
    }

    /// Overlay the halves present in `other` on top of `self`.
    pub fn merge(&mut self, other: EnvironmentCredentials) {
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.api_secret.is_some() {
            self.api_secret = other.api_secret;
        }
        if other.sr_api_key.is_some() {
            self.sr_api_key = other.sr_api_key;
        }
        if other.sr_api_secret.is_some() {
            self.sr_api_secret = other.sr_api_secret;
        }
    }
}

/// Which credentials a request needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CredentialScope {
    /// Organization-wide management API (`api.confluent.cloud`).
    Organization,
    /// Kafka REST endpoint of a cluster in the environment.
    Cluster(EnvironmentId),
    /// Schema Registry endpoint in the environment.
    SchemaRegistry(EnvironmentId),
}

impl CredentialScope {
    pub fn environment(&self) -> Option<&EnvironmentId> {
        match self {
            CredentialScope::Organization => None,
            CredentialScope::Cluster(env) | CredentialScope::SchemaRegistry(env) => Some(env),
        }
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialScope::Organization => f.write_str("organization"),
            CredentialScope::Cluster(env) => write!(f, "cluster in {env}"),
            CredentialScope::SchemaRegistry(env) => write!(f, "schema registry in {env}"),
        }
    }
}

/// Default pair plus per-environment overrides, indexed by environment id.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    default: Option<ApiKey>,
    environments: HashMap<EnvironmentId, EnvironmentCredentials>,
}

impl CredentialStore {
    pub fn new(default: Option<ApiKey>) -> Self {
        Self {
            default: default.filter(ApiKey::is_complete),
            environments: HashMap::new(),
        }
    }

    pub fn with_environment(
        mut self,
        environment: impl Into<EnvironmentId>,
        credentials: EnvironmentCredentials,
    ) -> Self {
        self.environments.insert(environment.into(), credentials);
        self
    }

    pub fn default_key(&self) -> Option<&ApiKey> {
        self.default.as_ref()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Pick the key pair for `scope`, or `None` when nothing usable is
    /// configured and the request should be skipped.
    pub fn select(&self, scope: &CredentialScope) -> Option<ApiKey> {
        let Some(env) = scope.environment() else {
            return self.default.clone();
        };

        let Some(credentials) = self.environments.get(env) else {
            warn!(
                environment = %env,
                "No credentials configured for environment, using default credentials"
            );
            return self.default.clone();
        };

        let scoped = match scope {
            CredentialScope::Cluster(_) => credentials.cluster(),
            CredentialScope::SchemaRegistry(_) => credentials.schema_registry(),
            CredentialScope::Organization => None,
        };
        scoped.or_else(|| self.default.clone())
    }
}
