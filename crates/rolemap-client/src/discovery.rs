//! Resource discovery.
//!
//! One operation per collection. Each returns the complete collection (all
//! pages) in one call, or an empty sequence when the listing failed; the
//! failure is logged and discovery carries on with whatever else it finds.
//!
//! | operation | endpoint | credentials |
//! |---|---|---|
//! | `list_organizations` | `/org/v2/organizations` | default |
//! | `list_environments` | `/org/v2/environments` | default |
//! | `list_service_accounts` | `/iam/v2/service-accounts` | default |
//! | `list_clusters` | `/cmk/v2/clusters?environment=` | default |
//! | `list_topics` | `<kafka rest>/kafka/v3/clusters/<id>/topics` | cluster |
//! | `list_sr_clusters` | `/srcm/v3/clusters?environment=` | default |
//! | `list_sr_subjects` | `<sr endpoint>/subjects` | schema registry |

use crate::credentials::CredentialScope;
use crate::endpoints::ApiEndpoints;
use crate::pagination::{collect_pages, DEFAULT_MAX_PAGES};
use crate::transport::{Request, Transport};
use rolemap_core::{
    EnvironmentId, KafkaCluster, KafkaTopic, OrganizationId, SchemaRegistryCluster,
    SchemaSubject, ServiceAccountId,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct DiscoveryClient {
    transport: Arc<dyn Transport>,
    endpoints: ApiEndpoints,
    max_pages: usize,
}

impl DiscoveryClient {
    pub fn new(transport: Arc<dyn Transport>, endpoints: ApiEndpoints) -> Self {
        Self {
            transport,
            endpoints,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub async fn list_organizations(&self) -> Vec<OrganizationId> {
        let request = Request::get(self.endpoints.organizations(), CredentialScope::Organization);
        match self.collect(request).await {
            Some(items) => string_fields(&items, "id").map(OrganizationId::new).collect(),
            None => {
                warn!("No organizations found or invalid API response");
                Vec::new()
            }
        }
    }

    pub async fn list_environments(&self) -> Vec<EnvironmentId> {
        let request = Request::get(self.endpoints.environments(), CredentialScope::Organization);
        match self.collect(request).await {
            Some(items) => string_fields(&items, "id").map(EnvironmentId::new).collect(),
            None => {
                warn!("No environments found or invalid API response");
                Vec::new()
            }
        }
    }

    pub async fn list_service_accounts(&self) -> Vec<ServiceAccountId> {
        let request = Request::get(
            self.endpoints.service_accounts(),
            CredentialScope::Organization,
        );
        match self.collect(request).await {
            Some(items) => string_fields(&items, "id").map(ServiceAccountId::new).collect(),
            None => {
                warn!("No service accounts found or invalid API response");
                Vec::new()
            }
        }
    }

    /// Kafka clusters of each environment, tagged with that environment.
    pub async fn list_clusters(&self, environments: &[EnvironmentId]) -> Vec<KafkaCluster> {
        let mut clusters = Vec::new();

        for env in environments {
            let request = Request::get(self.endpoints.clusters(), CredentialScope::Organization)
                .query("environment", env.as_str());
            let Some(items) = self.collect(request).await else {
                warn!(environment = %env, "No clusters found or invalid API response");
                continue;
            };

            for item in &items {
                let Some(id) = item.get("id").and_then(Value::as_str) else {
                    debug!(environment = %env, "Skipping cluster entry without id");
                    continue;
                };
                let mut cluster = KafkaCluster::new(id, env.clone());
                if let Some(endpoint) = spec_http_endpoint(item) {
                    cluster = cluster.with_http_endpoint(endpoint);
                }
                clusters.push(cluster);
            }
        }

        clusters
    }

    /// Topics of each cluster, queried with the cluster's environment credentials.
    pub async fn list_topics(&self, clusters: &[KafkaCluster]) -> Vec<KafkaTopic> {
        let mut topics = Vec::new();

        for cluster in clusters {
            let Some(url) = self.endpoints.topics(cluster) else {
                warn!(
                    cluster = %cluster.id,
                    environment = %cluster.environment_id,
                    "No Kafka REST endpoint known for cluster, skipping topics"
                );
                continue;
            };
            let request = Request::get(
                url,
                CredentialScope::Cluster(cluster.environment_id.clone()),
            );
            let Some(items) = self.collect(request).await else {
                warn!(cluster = %cluster.id, "No topics found or invalid API response");
                continue;
            };

            topics.extend(
                string_fields(&items, "topic_name").map(|name| KafkaTopic::new(name, cluster)),
            );
        }

        topics
    }

    /// Schema Registry clusters of each environment.
    ///
    /// Entries whose `spec` lacks an `http_endpoint` (or which have no id)
    /// are skipped with a warning; the rest of the environment is kept.
    pub async fn list_sr_clusters(
        &self,
        environments: &[EnvironmentId],
    ) -> Vec<SchemaRegistryCluster> {
        let mut registries = Vec::new();

        for env in environments {
            let request = Request::get(
                self.endpoints.schema_registry_clusters(),
                CredentialScope::Organization,
            )
            .query("environment", env.as_str());
            let Some(items) = self.collect(request).await else {
                warn!(
                    environment = %env,
                    "No Schema Registry clusters found or invalid API response"
                );
                continue;
            };

            for item in &items {
                if !item.get("spec").is_some_and(Value::is_object) {
                    warn!(environment = %env, "Schema Registry cluster has no spec, skipping");
                    continue;
                }
                let id = item.get("id").and_then(Value::as_str);
                match (id, spec_http_endpoint(item)) {
                    (Some(id), Some(endpoint)) => {
                        registries.push(SchemaRegistryCluster::new(id, env.clone(), endpoint));
                    }
                    _ => warn!(
                        environment = %env,
                        "Schema Registry cluster is missing id or http_endpoint, skipping"
                    ),
                }
            }
        }

        registries
    }

    /// Subjects of each Schema Registry cluster. The listing is a bare JSON
    /// array of names and is not paginated.
    pub async fn list_sr_subjects(
        &self,
        registries: &[SchemaRegistryCluster],
    ) -> Vec<SchemaSubject> {
        let mut subjects = Vec::new();

        for registry in registries {
            let request = Request::get(
                self.endpoints.subjects(registry),
                CredentialScope::SchemaRegistry(registry.environment_id.clone()),
            );
            let names = match self.transport.request(&request).await {
                Some(Value::Array(names)) => names,
                _ => {
                    warn!(
                        schema_registry = %registry.id,
                        "No subjects found or invalid API response"
                    );
                    continue;
                }
            };

            subjects.extend(
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|name| SchemaSubject::new(name, registry)),
            );
        }

        subjects
    }

    async fn collect(&self, request: Request) -> Option<Vec<Value>> {
        collect_pages(self.transport.as_ref(), request, self.max_pages).await
    }
}

fn string_fields<'a>(items: &'a [Value], field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    items
        .iter()
        .filter_map(move |item| item.get(field).and_then(Value::as_str))
}

fn spec_http_endpoint(item: &Value) -> Option<&str> {
    item.get("spec")?
        .get("http_endpoint")?
        .as_str()
        .filter(|endpoint| !endpoint.is_empty())
}
