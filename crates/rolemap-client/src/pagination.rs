//! Collection envelopes and page following.
//!
//! Listing endpoints answer with
//!
//! ```json
//! { "data": [ ... ], "metadata": { "next": "https://...?page_token=..." } }
//! ```
//!
//! [`collect_pages`] follows `metadata.next` until it is absent, null or
//! empty and returns every `data` item as one sequence.

use crate::transport::{Request, Transport};
use serde_json::Value;
use tracing::warn;

/// Default cap on pages read for a single collection.
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Fetch all pages of the collection starting at `first`.
///
/// Returns `None` if the first page fails or has no `data` array. A failure
/// on a later page is logged and the items gathered so far are returned.
pub async fn collect_pages<T>(transport: &T, first: Request, max_pages: usize) -> Option<Vec<Value>>
where
    T: Transport + ?Sized,
{
    let mut items = Vec::new();
    let mut request = first;

    for page in 1..=max_pages.max(1) {
        let Some(body) = transport.request(&request).await else {
            if page == 1 {
                return None;
            }
            warn!(url = %request.url, page, "Page request failed, keeping earlier pages");
            return Some(items);
        };

        let next = next_link(&body).map(str::to_string);
        let Some(data) = into_data(body) else {
            warn!(url = %request.url, page, "Response has no data array");
            return if page == 1 { None } else { Some(items) };
        };
        items.extend(data);

        match next {
            Some(url) => request = request.with_url(url),
            None => return Some(items),
        }
    }

    warn!(url = %request.url, max_pages, "Page limit reached, collection may be incomplete");
    Some(items)
}

fn next_link(body: &Value) -> Option<&str> {
    body.get("metadata")?
        .get("next")?
        .as_str()
        .filter(|next| !next.is_empty())
}

fn into_data(body: Value) -> Option<Vec<Value>> {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}
