//! Error types for rolemap client operations.
//!
//! Errors never cross a single request boundary: the transport logs them and
//! hands its callers an empty result instead. They exist so that the request
//! path itself can use `?` and so tests can assert on the failure kind.
//!
//! ## Categories
//!
//! - **Rate limiting**: `RateLimited` (429 after the retry cap)
//! - **HTTP**: `Http` (any other non-success status)
//! - **Network**: `Request`
//! - **Payload**: `MalformedResponse`
//! - **Credentials**: `MissingCredentials`
//! - **Setup**: `ClientBuild`

use thiserror::Error;

/// Convenience type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server kept answering 429 until the attempt cap was reached.
    #[error("Rate limited by {url} after {attempts} attempts")]
    RateLimited { url: String, attempts: u32 },

    /// Non-success status other than 429.
    #[error("HTTP {status} from {url}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    /// Connection, timeout or body-read failure.
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response was not the JSON shape expected.
    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    /// No non-empty key pair is configured for the request's scope.
    #[error("No credentials available for {scope}")]
    MissingCredentials { scope: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl ClientError {
    /// HTTP status associated with the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RateLimited { .. } => Some(429),
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Request { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
