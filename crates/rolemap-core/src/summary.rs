//! Grouping of aggregated bindings for the final report.

use crate::binding::{BindingSet, RoleBinding};
use indexmap::IndexMap;
use serde::Serialize;

/// Bindings of one resource, formatted as `SA: <id> - Role: <role>` lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceGroup {
    pub resource: String,
    pub entries: Vec<String>,
}

/// Bindings grouped by resource, groups in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub groups: Vec<ResourceGroup>,
    pub total: usize,
}

impl Summary {
    pub fn get(&self, resource: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|group| group.resource == resource)
            .map(|group| group.entries.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group `bindings` by their `resource` field.
///
/// Bindings without a `resource` are grouped under their CRN pattern instead.
pub fn summarize(bindings: &BindingSet) -> Summary {
    let mut groups: IndexMap<&str, Vec<String>> = IndexMap::new();

    for binding in bindings.iter() {
        groups
            .entry(resource_scope(binding))
            .or_default()
            .push(format!(
                "SA: {} - Role: {}",
                binding.principal_id(),
                binding.role_name
            ));
    }

    Summary {
        groups: groups
            .into_iter()
            .map(|(resource, entries)| ResourceGroup {
                resource: resource.to_string(),
                entries,
            })
            .collect(),
        total: bindings.len(),
    }
}

fn resource_scope(binding: &RoleBinding) -> &str {
    binding
        .resource
        .as_deref()
        .unwrap_or(binding.crn_pattern.as_str())
}
