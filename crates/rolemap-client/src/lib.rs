//! rolemap client
//!
//! Network side of a rolemap run.
//!
//! ## Components
//!
//! - [`HttpTransport`]: reqwest client with scoped basic-auth credentials and
//!   bounded retry on HTTP 429
//! - [`CredentialStore`]: default key pair plus per-environment cluster and
//!   Schema Registry pairs, injected into the transport at construction
//! - [`DiscoveryClient`]: lists organizations, environments, service
//!   accounts, clusters, topics, Schema Registry clusters and subjects,
//!   following pagination
//! - [`AuthorityClient`]: role-binding lookups, implementing
//!   [`rolemap_core::BindingAuthority`]
//!
//! Every call is sequential and failures stay local: a failed request is
//! logged and reads as "no data" to its caller.
//!
//! ## Example
//!
//! ```ignore
//! use rolemap_client::*;
//! use std::sync::Arc;
//!
//! let credentials = CredentialStore::new(Some(ApiKey::new(key, secret)));
//! let transport: Arc<dyn Transport> =
//!     Arc::new(HttpTransport::new(credentials, TransportConfig::default())?);
//! let discovery = DiscoveryClient::new(transport.clone(), ApiEndpoints::default());
//! let environments = discovery.list_environments().await;
//! ```

pub mod authority;
pub mod credentials;
pub mod discovery;
pub mod endpoints;
pub mod error;
pub mod pagination;
pub mod retry;
pub mod transport;

#[cfg(test)]
mod testing;

pub use authority::AuthorityClient;
pub use credentials::{ApiKey, CredentialScope, CredentialStore, EnvironmentCredentials};
pub use discovery::DiscoveryClient;
pub use endpoints::{ApiEndpoints, DEFAULT_API_BASE_URL};
pub use error::{ClientError, Result};
pub use pagination::{collect_pages, DEFAULT_MAX_PAGES};
pub use retry::RateLimitPolicy;
pub use transport::{HttpTransport, Request, Transport, TransportConfig};
