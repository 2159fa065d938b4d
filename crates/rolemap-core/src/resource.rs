//! Discovered resource identifiers and their containment links.
//!
//! Every identifier is an opaque string scoped to its own collection; no
//! uniqueness across collections is assumed. Resources below the environment
//! level carry the parent identifiers they were discovered under, so a
//! cluster, topic or subject can never be paired with an environment it does
//! not belong to.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Organization id (a UUID on the platform).
    OrganizationId
);
string_id!(
    /// Environment id, e.g. `env-qzn062`.
    EnvironmentId
);
string_id!(
    /// Kafka cluster id, e.g. `lkc-abc123`.
    ClusterId
);
string_id!(
    /// Topic name, unique only within its cluster.
    TopicName
);
string_id!(
    /// Schema Registry cluster id, e.g. `lsrc-xyz789`.
    SchemaRegistryId
);
string_id!(
    /// Subject name, unique only within its Schema Registry cluster.
    SubjectName
);
string_id!(
    /// Service account id, e.g. `sa-1a2b3c`.
    ServiceAccountId
);

impl ServiceAccountId {
    /// The principal string the access-control API expects (`User:<id>`).
    pub fn principal(&self) -> String {
        format!("User:{}", self.0)
    }
}

/// A Kafka cluster and the environment it was listed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KafkaCluster {
    pub id: ClusterId,
    pub environment_id: EnvironmentId,
    /// Kafka REST endpoint from the cluster spec, when the listing carried one.
    pub http_endpoint: Option<String>,
}

impl KafkaCluster {
    pub fn new(id: impl Into<ClusterId>, environment_id: impl Into<EnvironmentId>) -> Self {
        Self {
            id: id.into(),
            environment_id: environment_id.into(),
            http_endpoint: None,
        }
    }

    pub fn with_http_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.http_endpoint = Some(endpoint.into());
        self
    }
}

/// A topic and the cluster (and environment) it was listed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KafkaTopic {
    pub name: TopicName,
    pub cluster_id: ClusterId,
    pub environment_id: EnvironmentId,
}

impl KafkaTopic {
    pub fn new(name: impl Into<TopicName>, cluster: &KafkaCluster) -> Self {
        Self {
            name: name.into(),
            cluster_id: cluster.id.clone(),
            environment_id: cluster.environment_id.clone(),
        }
    }

    pub fn belongs_to(&self, cluster: &KafkaCluster) -> bool {
        self.cluster_id == cluster.id && self.environment_id == cluster.environment_id
    }
}

/// A Schema Registry cluster, its REST endpoint, and its environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaRegistryCluster {
    pub id: SchemaRegistryId,
    pub environment_id: EnvironmentId,
    pub http_endpoint: String,
}

impl SchemaRegistryCluster {
    pub fn new(
        id: impl Into<SchemaRegistryId>,
        environment_id: impl Into<EnvironmentId>,
        http_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            environment_id: environment_id.into(),
            http_endpoint: http_endpoint.into(),
        }
    }
}

/// A subject and the Schema Registry cluster it was listed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaSubject {
    pub name: SubjectName,
    pub schema_registry_id: SchemaRegistryId,
    pub environment_id: EnvironmentId,
}

impl SchemaSubject {
    pub fn new(name: impl Into<SubjectName>, registry: &SchemaRegistryCluster) -> Self {
        Self {
            name: name.into(),
            schema_registry_id: registry.id.clone(),
            environment_id: registry.environment_id.clone(),
        }
    }

    pub fn belongs_to(&self, registry: &SchemaRegistryCluster) -> bool {
        self.schema_registry_id == registry.id && self.environment_id == registry.environment_id
    }
}

/// Everything one discovery run found, below the principal level.
///
/// All sets are transient and owned by a single run.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub organizations: Vec<OrganizationId>,
    pub environments: Vec<EnvironmentId>,
    pub clusters: Vec<KafkaCluster>,
    pub topics: Vec<KafkaTopic>,
    pub schema_registries: Vec<SchemaRegistryCluster>,
    pub subjects: Vec<SchemaSubject>,
}

impl Topology {
    /// Clusters whose recorded parent environment is `environment`.
    pub fn clusters_in<'a>(
        &'a self,
        environment: &'a EnvironmentId,
    ) -> impl Iterator<Item = &'a KafkaCluster> + 'a {
        self.clusters
            .iter()
            .filter(move |cluster| &cluster.environment_id == environment)
    }

    pub fn topics_in<'a>(
        &'a self,
        cluster: &'a KafkaCluster,
    ) -> impl Iterator<Item = &'a KafkaTopic> + 'a {
        self.topics.iter().filter(move |topic| topic.belongs_to(cluster))
    }

    /// Schema Registry clusters whose recorded parent environment is `environment`.
    pub fn schema_registries_in<'a>(
        &'a self,
        environment: &'a EnvironmentId,
    ) -> impl Iterator<Item = &'a SchemaRegistryCluster> + 'a {
        self.schema_registries
            .iter()
            .filter(move |registry| &registry.environment_id == environment)
    }

    pub fn subjects_in<'a>(
        &'a self,
        registry: &'a SchemaRegistryCluster,
    ) -> impl Iterator<Item = &'a SchemaSubject> + 'a {
        self.subjects
            .iter()
            .filter(move |subject| subject.belongs_to(registry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_format() {
        assert_eq!(ServiceAccountId::new("sa-123").principal(), "User:sa-123");
    }

    #[test]
    fn test_topic_inherits_cluster_parents() {
        let cluster = KafkaCluster::new("lkc-1", "env-a");
        let topic = KafkaTopic::new("orders", &cluster);
        assert_eq!(topic.cluster_id.as_str(), "lkc-1");
        assert_eq!(topic.environment_id.as_str(), "env-a");
        assert!(topic.belongs_to(&cluster));
    }

    #[test]
    fn test_same_cluster_id_in_other_environment_is_not_parent() {
        let cluster_a = KafkaCluster::new("lkc-1", "env-a");
        let cluster_b = KafkaCluster::new("lkc-1", "env-b");
        let topic = KafkaTopic::new("orders", &cluster_a);
        assert!(!topic.belongs_to(&cluster_b));
    }

    #[test]
    fn test_topology_filters_by_environment() {
        let topology = Topology {
            environments: vec!["env-a".into(), "env-b".into()],
            clusters: vec![
                KafkaCluster::new("lkc-a1", "env-a"),
                KafkaCluster::new("lkc-b1", "env-b"),
                KafkaCluster::new("lkc-a2", "env-a"),
            ],
            ..Default::default()
        };

        let env_a = EnvironmentId::new("env-a");
        let ids: Vec<&str> = topology
            .clusters_in(&env_a)
            .map(|cluster| cluster.id.as_str())
            .collect();
        assert_eq!(ids, vec!["lkc-a1", "lkc-a2"]);
    }

    #[test]
    fn test_subjects_follow_their_registry() {
        let sr_a = SchemaRegistryCluster::new("lsrc-a", "env-a", "https://psrc-a");
        let sr_b = SchemaRegistryCluster::new("lsrc-b", "env-b", "https://psrc-b");
        let topology = Topology {
            subjects: vec![
                SchemaSubject::new("orders-value", &sr_a),
                SchemaSubject::new("payments-value", &sr_b),
            ],
            schema_registries: vec![sr_a.clone(), sr_b],
            ..Default::default()
        };

        let names: Vec<&str> = topology
            .subjects_in(&sr_a)
            .map(|subject| subject.name.as_str())
            .collect();
        assert_eq!(names, vec!["orders-value"]);
    }
}
