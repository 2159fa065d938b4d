//! In-memory transport for unit tests.

use crate::transport::{Request, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Answers requests from a fixed table keyed by URL plus query string.
/// Unknown requests fail (`None`), like a logged HTTP error would.
#[derive(Default)]
pub(crate) struct FakeTransport {
    responses: HashMap<String, Value>,
    requests: Mutex<Vec<Request>>,
}

impl FakeTransport {
    pub(crate) fn respond(mut self, key: &str, body: Value) -> Self {
        self.responses.insert(key.to_string(), body);
        self
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn requested_urls(&self) -> Vec<String> {
        self.requests().iter().map(request_key).collect()
    }
}

/// `url` or `url?k=v&k2=v2`, parameters in insertion order, unencoded.
pub(crate) fn request_key(request: &Request) -> String {
    if request.params.is_empty() {
        return request.url.clone();
    }
    let query: Vec<String> = request
        .params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    format!("{}?{}", request.url, query.join("&"))
}

#[async_trait]
impl Transport for FakeTransport {
    async fn request(&self, request: &Request) -> Option<Value> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses.get(&request_key(request)).cloned()
    }
}
