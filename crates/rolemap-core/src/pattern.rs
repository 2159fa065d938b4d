//! Hierarchical scope patterns (CRN strings).
//!
//! A pattern encodes a full containment path from an organization down to
//! one of five levels:
//!
//! ```text
//! crn://confluent.cloud/organization=<org>
//!   /environment=<env>
//!     /cloud-cluster=<lkc>/kafka=<lkc>
//!       /topic=<name>
//!     /schema-registry=<lsrc>/subject=<name>
//! ```
//!
//! Constructors below the environment level take the discovered resource
//! itself and read its parent ids from it, so a pattern can only ever name
//! the environment a cluster, topic or subject was discovered under.

use crate::resource::{
    EnvironmentId, KafkaCluster, KafkaTopic, OrganizationId, SchemaSubject,
};
use serde::Serialize;
use std::fmt;

/// Root of every pattern.
pub const CRN_AUTHORITY: &str = "crn://confluent.cloud";

/// The resource level a pattern addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeLevel {
    Organization,
    Environment,
    KafkaCluster,
    KafkaTopic,
    SchemaSubject,
}

impl ScopeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeLevel::Organization => "organization",
            ScopeLevel::Environment => "environment",
            ScopeLevel::KafkaCluster => "kafka-cluster",
            ScopeLevel::KafkaTopic => "kafka-topic",
            ScopeLevel::SchemaSubject => "schema-registry-subject",
        }
    }
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CRN pattern at a given scope level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScopePattern {
    level: ScopeLevel,
    crn: String,
}

impl ScopePattern {
    pub fn organization(org: &OrganizationId) -> Self {
        Self {
            level: ScopeLevel::Organization,
            crn: format!("{CRN_AUTHORITY}/organization={org}"),
        }
    }

    pub fn environment(org: &OrganizationId, env: &EnvironmentId) -> Self {
        Self {
            level: ScopeLevel::Environment,
            crn: format!("{CRN_AUTHORITY}/organization={org}/environment={env}"),
        }
    }

    pub fn kafka_cluster(org: &OrganizationId, cluster: &KafkaCluster) -> Self {
        Self {
            level: ScopeLevel::KafkaCluster,
            crn: format!(
                "{CRN_AUTHORITY}/organization={org}/environment={env}/cloud-cluster={id}/kafka={id}",
                env = cluster.environment_id,
                id = cluster.id,
            ),
        }
    }

    pub fn kafka_topic(org: &OrganizationId, topic: &KafkaTopic) -> Self {
        Self {
            level: ScopeLevel::KafkaTopic,
            crn: format!(
                "{CRN_AUTHORITY}/organization={org}/environment={env}/cloud-cluster={id}/kafka={id}/topic={name}",
                env = topic.environment_id,
                id = topic.cluster_id,
                name = topic.name,
            ),
        }
    }

    pub fn schema_subject(org: &OrganizationId, subject: &SchemaSubject) -> Self {
        Self {
            level: ScopeLevel::SchemaSubject,
            crn: format!(
                "{CRN_AUTHORITY}/organization={org}/environment={env}/schema-registry={sr}/subject={name}",
                env = subject.environment_id,
                sr = subject.schema_registry_id,
                name = subject.name,
            ),
        }
    }

    pub fn level(&self) -> ScopeLevel {
        self.level
    }

    pub fn as_str(&self) -> &str {
        &self.crn
    }
}

impl fmt::Display for ScopePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.crn)
    }
}
