//! Marker-based pagination and URL helpers

use std::ops::{Deref, DerefMut};

use serde::Serialize;
use serde_json::Value;
use url::Url;

/// One page of results plus the marker for the next page
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Marker of the next page; `None` on the last page
    pub next: Option<String>,
    /// Raw navigation links as sent by the server
    pub links: Vec<Value>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, next: Option<String>, links: Vec<Value>) -> Self {
        Self { items, next, links }
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self::new(Vec::new(), None, Vec::new())
    }
}

impl<T> Deref for Paginated<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> DerefMut for Paginated<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.items
    }
}

impl<T> IntoIterator for Paginated<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Paginated<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// `next` and `links` are navigation metadata, not part of the sequence
impl<T: PartialEq> PartialEq for Paginated<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for Paginated<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        &self.items == other
    }
}

/// Append `limit`/`marker` style query parameters that are present
pub fn append_query(url: &str, params: &[(&str, Option<String>)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| format!("{}={}", key, urlencoding::encode(v)))
        })
        .collect();

    if query.is_empty() {
        return url.to_string();
    }

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, query.join("&"))
}

/// Shorthand for the common `limit` + `marker` pair
pub fn paginate_query(url: &str, limit: Option<u32>, marker: Option<&str>) -> String {
    append_query(
        url,
        &[
            ("limit", limit.map(|l| l.to_string())),
            ("marker", marker.map(str::to_string)),
        ],
    )
}

/// Find the `marker` of the `rel=next` link in a links array
pub fn next_marker(links: &[Value]) -> Option<String> {
    let href = links
        .iter()
        .find(|link| link.get("rel").and_then(Value::as_str) == Some("next"))?
        .get("href")
        .and_then(Value::as_str)?;

    // Relative hrefs are resolved against a dummy base just to parse the query
    let parsed = Url::parse(href)
        .or_else(|_| Url::parse("http://localhost/").and_then(|base| base.join(href)))
        .ok()?;

    parsed
        .query_pairs()
        .find(|(key, _)| key == "marker")
        .map(|(_, value)| value.into_owned())
}

/// Links of a list envelope: `links`, falling back to `<key>_links`
pub fn envelope_links(body: &Value, response_key: &str) -> Vec<Value> {
    body.get("links")
        .or_else(|| body.get(format!("{}_links", response_key)))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Quote `user@host` for use as a single path segment. Dots are escaped as
/// well so hostnames survive servers that split extensions off paths.
pub fn quote_user_host(user: &str, host: Option<&str>) -> String {
    let raw = match host {
        Some(host) => format!("{}@{}", user, host),
        None => user.to_string(),
    };
    urlencoding::encode(&raw).replace('.', "%2e")
}
