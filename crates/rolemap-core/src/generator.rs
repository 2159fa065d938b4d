//! Scope pattern generation.
//!
//! Turns a discovered [`Topology`] and a list of principals into the lazy
//! sequence of `(principal, pattern)` queries that must be sent to the
//! access-control API. No I/O happens here.
//!
//! ## Enumeration order
//!
//! ```text
//! for principal
//!   for organization                      -> organization pattern
//!     for environment                     -> environment pattern
//!       for cluster in environment        -> cluster pattern
//!         for topic in cluster            -> topic pattern
//!       for sr cluster in environment
//!         for subject in sr cluster       -> subject pattern
//! ```
//!
//! Clusters and Schema Registry clusters are only visited while iterating the
//! environment they were discovered under; topics and subjects only under the
//! cluster they were listed from. This is narrower than crossing every topic
//! with every cluster: a topic is never paired with a cluster it was not
//! listed from.
//!
//! An organization is only queried when at least one environment was
//! discovered, so zero principals, zero organizations or zero environments
//! all yield an empty sequence.
//!
//! The output size is the full cross product of principals, organizations
//! and the environment subtrees. Callers that need a smaller run should
//! shrink the inputs first.

use crate::pattern::ScopePattern;
use crate::resource::{EnvironmentId, OrganizationId, ServiceAccountId, Topology};
use std::iter;

/// One lookup to perform: a principal against a scope pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeQuery<'a> {
    pub principal: &'a ServiceAccountId,
    pub pattern: ScopePattern,
}

/// Enumerate every query for `principals` over `topology`.
///
/// The sequence is empty when `principals`, the organizations or the
/// environments of `topology` are empty.
pub fn scope_queries<'a>(
    principals: &'a [ServiceAccountId],
    topology: &'a Topology,
) -> impl Iterator<Item = ScopeQuery<'a>> + 'a {
    principals.iter().flat_map(move |principal| {
        topology
            .organizations
            .iter()
            .flat_map(move |org| organization_patterns(topology, org))
            .map(move |pattern| ScopeQuery { principal, pattern })
    })
}

fn organization_patterns<'a>(
    topology: &'a Topology,
    org: &'a OrganizationId,
) -> impl Iterator<Item = ScopePattern> + 'a {
    let environments = &topology.environments;
    let organization = (!environments.is_empty()).then(|| ScopePattern::organization(org));

    organization.into_iter().chain(
        environments
            .iter()
            .flat_map(move |env| environment_patterns(topology, org, env)),
    )
}

fn environment_patterns<'a>(
    topology: &'a Topology,
    org: &'a OrganizationId,
    env: &'a EnvironmentId,
) -> impl Iterator<Item = ScopePattern> + 'a {
    let kafka = topology.clusters_in(env).flat_map(move |cluster| {
        iter::once(ScopePattern::kafka_cluster(org, cluster)).chain(
            topology
                .topics_in(cluster)
                .map(move |topic| ScopePattern::kafka_topic(org, topic)),
        )
    });

    let schema_registry = topology.schema_registries_in(env).flat_map(move |registry| {
        topology
            .subjects_in(registry)
            .map(move |subject| ScopePattern::schema_subject(org, subject))
    });

    iter::once(ScopePattern::environment(org, env))
        .chain(kafka)
        .chain(schema_registry)
}
