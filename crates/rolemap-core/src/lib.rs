//! rolemap core
//!
//! The pure part of a rolemap run: resource and binding types, the scope
//! pattern generator, the deduplicating aggregator and the report summary.
//!
//! ## Pipeline
//!
//! ```text
//! Topology + principals
//!        │
//!        ▼
//! scope_queries()      (principal, CRN pattern) pairs, lazily
//!        │
//!        ▼
//! aggregate()          one BindingAuthority::lookup per pair -> BindingSet
//!        │
//!        ▼
//! summarize()          bindings grouped by resource
//! ```
//!
//! Network access lives behind [`BindingAuthority`]; the `rolemap-client`
//! crate provides the HTTP implementation.

pub mod aggregate;
pub mod binding;
pub mod generator;
pub mod pattern;
pub mod resource;
pub mod summary;

pub use aggregate::{aggregate, AggregateStats, BindingAuthority};
pub use binding::{BindingId, BindingSet, RoleBinding};
pub use generator::{scope_queries, ScopeQuery};
pub use pattern::{ScopeLevel, ScopePattern, CRN_AUTHORITY};
pub use resource::{
    ClusterId, EnvironmentId, KafkaCluster, KafkaTopic, OrganizationId, SchemaRegistryCluster,
    SchemaRegistryId, SchemaSubject, ServiceAccountId, SubjectName, TopicName, Topology,
};
pub use summary::{summarize, ResourceGroup, Summary};
