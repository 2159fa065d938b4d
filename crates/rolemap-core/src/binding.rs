//! Role binding records as returned by the access-control API.

use serde::{Deserialize, Serialize};
use indexmap::map::{Entry, IndexMap};
use std::fmt;

/// Identity of a role binding. Two records with the same id are the same
/// binding, whichever pattern query returned them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingId(String);

impl BindingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    pub id: BindingId,
    /// Resource kind the authority reports for this binding. Not every API
    /// version returns it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default)]
    pub role_name: String,
    /// Principal string, e.g. `User:sa-123`.
    #[serde(default)]
    pub principal: String,
    #[serde(default)]
    pub crn_pattern: String,
}

impl RoleBinding {
    /// Last colon-delimited segment of the principal (`User:sa-1` -> `sa-1`).
    pub fn principal_id(&self) -> &str {
        self.principal.rsplit(':').next().unwrap_or_default()
    }
}

/// Deduplicating map of bindings keyed by [`BindingId`], in the order each
/// id was first inserted.
///
/// Inserting a binding whose id is already present is a no-op: the authority
/// guarantees equal ids carry equal content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BindingSet {
    bindings: IndexMap<BindingId, RoleBinding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a binding, returning `true` if its id was not yet present.
    pub fn insert(&mut self, binding: RoleBinding) -> bool {
        match self.bindings.entry(binding.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(binding);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, id: &BindingId) -> Option<&RoleBinding> {
        self.bindings.get(id)
    }

    pub fn contains(&self, id: &BindingId) -> bool {
        self.bindings.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleBinding> {
        self.bindings.values()
    }
}

impl Extend<RoleBinding> for BindingSet {
    fn extend<I: IntoIterator<Item = RoleBinding>>(&mut self, iter: I) {
        for binding in iter {
            self.insert(binding);
        }
    }
}

impl FromIterator<RoleBinding> for BindingSet {
    fn from_iter<I: IntoIterator<Item = RoleBinding>>(iter: I) -> Self {
        let mut set = BindingSet::new();
        set.extend(iter);
        set
    }
}
