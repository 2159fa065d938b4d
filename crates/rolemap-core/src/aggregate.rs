//! Binding lookup and aggregation.
//!
//! [`aggregate`] drives one lookup per `(principal, pattern)` query, in the
//! order the generator yields them, and folds every returned binding into a
//! single [`BindingSet`]. Lookups are issued one at a time; each is awaited
//! to completion before the next begins.
//!
//! A failed or empty lookup contributes nothing and never stops the run, so
//! the result always holds everything that *was* found.

use crate::binding::{BindingSet, RoleBinding};
use crate::generator::ScopeQuery;
use crate::pattern::ScopePattern;
use crate::resource::ServiceAccountId;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

/// Source of role bindings for a principal at a scope pattern.
#[async_trait]
pub trait BindingAuthority: Send + Sync {
    /// Look up the bindings `principal` holds at exactly `pattern`.
    ///
    /// Returns `None` when the lookup failed (the failure has already been
    /// logged by the implementation) and `Some(vec![])` when the authority
    /// answered with no bindings.
    async fn lookup(
        &self,
        principal: &ServiceAccountId,
        pattern: &ScopePattern,
    ) -> Option<Vec<RoleBinding>>;
}

/// Counters for one aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    /// Lookups issued.
    pub queries: usize,
    /// Lookups that failed and contributed nothing.
    pub failed: usize,
    /// Bindings returned across all lookups, before deduplication.
    pub returned: usize,
    /// Unique bindings in the final set.
    pub unique: usize,
}

/// Run every query against `authority` and merge the results by binding id.
pub async fn aggregate<'a, A, I>(authority: &A, queries: I) -> (BindingSet, AggregateStats)
where
    A: BindingAuthority + ?Sized,
    I: IntoIterator<Item = ScopeQuery<'a>>,
{
    let mut bindings = BindingSet::new();
    let mut stats = AggregateStats::default();
    let mut current: Option<&ServiceAccountId> = None;

    for query in queries {
        if current != Some(query.principal) {
            info!(principal = %query.principal, "Collecting role bindings");
            current = Some(query.principal);
        }

        stats.queries += 1;
        match authority.lookup(query.principal, &query.pattern).await {
            Some(found) => {
                debug!(
                    principal = %query.principal,
                    level = %query.pattern.level(),
                    crn_pattern = %query.pattern,
                    count = found.len(),
                    "Lookup complete"
                );
                stats.returned += found.len();
                bindings.extend(found);
            }
            None => stats.failed += 1,
        }
    }

    stats.unique = bindings.len();
    (bindings, stats)
}
