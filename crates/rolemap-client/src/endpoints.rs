//! URLs of the management, Kafka REST and Schema Registry APIs.

use rolemap_core::{KafkaCluster, SchemaRegistryCluster};

pub const DEFAULT_API_BASE_URL: &str = "https://api.confluent.cloud";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    api_base_url: String,
    cluster_rest_url: Option<String>,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl ApiEndpoints {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: trim_slash(api_base_url.into()),
            cluster_rest_url: None,
        }
    }

    /// Kafka REST endpoint used for clusters whose listing carried none.
    pub fn with_cluster_rest_url(mut self, url: impl Into<String>) -> Self {
        self.cluster_rest_url = Some(trim_slash(url.into()));
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn organizations(&self) -> String {
        format!("{}/org/v2/organizations", self.api_base_url)
    }

    pub fn environments(&self) -> String {
        format!("{}/org/v2/environments", self.api_base_url)
    }

    pub fn clusters(&self) -> String {
        format!("{}/cmk/v2/clusters", self.api_base_url)
    }

    pub fn schema_registry_clusters(&self) -> String {
        format!("{}/srcm/v3/clusters", self.api_base_url)
    }

    pub fn service_accounts(&self) -> String {
        format!("{}/iam/v2/service-accounts", self.api_base_url)
    }

    pub fn role_bindings(&self) -> String {
        format!("{}/iam/v2/role-bindings", self.api_base_url)
    }

    /// Topic listing for `cluster`, or `None` if no REST endpoint is known.
    pub fn topics(&self, cluster: &KafkaCluster) -> Option<String> {
        let base = cluster
            .http_endpoint
            .as_deref()
            .map(|endpoint| endpoint.trim_end_matches('/'))
            .or(self.cluster_rest_url.as_deref())?;
        Some(format!("{base}/kafka/v3/clusters/{}/topics", cluster.id))
    }

    pub fn subjects(&self, registry: &SchemaRegistryCluster) -> String {
        format!("{}/subjects", registry.http_endpoint.trim_end_matches('/'))
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
