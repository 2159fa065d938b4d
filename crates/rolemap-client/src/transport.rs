//! HTTP transport with scoped credentials and rate-limit retry.
//!
//! [`Transport`] is the seam every discovery and lookup call goes through.
//! Its contract is lossy: a request either yields a JSON value
//! or `None`, and any failure has been logged before `None` is returned.
//!
//! [`HttpTransport`] is the reqwest implementation:
//! - basic auth with the pair the [`CredentialStore`] selects for the
//!   request's [`CredentialScope`]; no pair means the request is not sent
//! - 429 responses retried per [`RateLimitPolicy`]
//! - other non-success statuses logged with status and body
//! - `204 No Content` and empty bodies yield `None`

use crate::credentials::{CredentialScope, CredentialStore};
use crate::error::{ClientError, Result};
use crate::retry::RateLimitPolicy;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// One HTTP request, described independently of the client that sends it.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
    pub scope: CredentialScope,
}

impl Request {
    pub fn get(url: impl Into<String>, scope: CredentialScope) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            params: Vec::new(),
            body: None,
            scope,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Same method, scope and body against another URL, without query
    /// parameters. Used to follow `next` links, which carry their own query.
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            method: self.method.clone(),
            url: url.into(),
            params: Vec::new(),
            body: self.body.clone(),
            scope: self.scope.clone(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return its JSON body, or `None` on any failure.
    async fn request(&self, request: &Request) -> Option<Value>;
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout (default: 30s)
    pub timeout: Duration,
    pub rate_limit: RateLimitPolicy,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            rate_limit: RateLimitPolicy::default(),
        }
    }
}

pub struct HttpTransport {
    client: Client,
    credentials: CredentialStore,
    config: TransportConfig,
}

impl HttpTransport {
    pub fn new(credentials: CredentialStore, config: TransportConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::ClientBuild)?;

        Ok(Self {
            client,
            credentials,
            config,
        })
    }

    /// Send `request`, retrying on 429 up to the configured attempt cap.
    pub async fn send(&self, request: &Request) -> Result<Option<Value>> {
        let key = self
            .credentials
            .select(&request.scope)
            .ok_or_else(|| ClientError::MissingCredentials {
                scope: request.scope.to_string(),
            })?;
        let policy = &self.config.rate_limit;
        let mut attempt = 1;

        loop {
            let mut builder = self
                .client
                .request(request.method.clone(), &request.url)
                .basic_auth(&key.key, Some(&key.secret))
                .header(CONTENT_TYPE, "application/json");
            if !request.params.is_empty() {
                builder = builder.query(&request.params);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            debug!(method = %request.method, url = %request.url, attempt, "Sending request");
            let response = builder.send().await.map_err(|source| ClientError::Request {
                url: request.url.clone(),
                source,
            })?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if !policy.should_retry(attempt) {
                    return Err(ClientError::RateLimited {
                        url: request.url.clone(),
                        attempts: attempt,
                    });
                }
                let delay = policy.delay(
                    response
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|value| value.to_str().ok()),
                );
                warn!(
                    url = %request.url,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_secs = delay.as_secs(),
                    "Rate limited, backing off"
                );
                drop(response);
                sleep(delay).await;
                attempt += 1;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ClientError::Http {
                    url: request.url.clone(),
                    status: status.as_u16(),
                    body,
                });
            }

            if status == StatusCode::NO_CONTENT {
                return Ok(None);
            }

            let bytes = response.bytes().await.map_err(|source| ClientError::Request {
                url: request.url.clone(),
                source,
            })?;
            if bytes.is_empty() {
                return Ok(None);
            }

            return serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| ClientError::MalformedResponse {
                    url: request.url.clone(),
                    reason: e.to_string(),
                });
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: &Request) -> Option<Value> {
        match self.send(request).await {
            Ok(value) => value,
            Err(err @ ClientError::MissingCredentials { .. }) => {
                error!(url = %request.url, error = %err, "Skipping request");
                None
            }
            Err(err) => {
                error!(
                    url = %request.url,
                    status = err.status(),
                    error = %err,
                    "Request failed"
                );
                None
            }
        }
    }
}
