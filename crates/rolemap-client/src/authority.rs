//! Role-binding lookups against the IAM API.

use crate::credentials::CredentialScope;
use crate::endpoints::ApiEndpoints;
use crate::pagination::{collect_pages, DEFAULT_MAX_PAGES};
use crate::transport::{Request, Transport};
use async_trait::async_trait;
use rolemap_core::{BindingAuthority, RoleBinding, ScopePattern, ServiceAccountId};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Queries `/iam/v2/role-bindings` with `principal` and `crn_pattern`.
pub struct AuthorityClient {
    transport: Arc<dyn Transport>,
    endpoints: ApiEndpoints,
    max_pages: usize,
}

impl AuthorityClient {
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

    fn request(&self, principal: &ServiceAccountId, pattern: &ScopePattern) -> Request {
        Request::get(self.endpoints.role_bindings(), CredentialScope::Organization)
            .query("principal", principal.principal())
            .query("crn_pattern", pattern.as_str())
    }
}

#[async_trait]
impl BindingAuthority for AuthorityClient {
    async fn lookup(
        &self,
        principal: &ServiceAccountId,
        pattern: &ScopePattern,
    ) -> Option<Vec<RoleBinding>> {
        let request = self.request(principal, pattern);
        let items = collect_pages(self.transport.as_ref(), request, self.max_pages).await?;
        Some(items.into_iter().filter_map(parse_binding).collect())
    }
}

fn parse_binding(item: Value) -> Option<RoleBinding> {
    match serde_json::from_value(item) {
        Ok(binding) => Some(binding),
        Err(e) => {
            warn!(error = %e, "Skipping malformed role binding");
            None
        }
    }
}
