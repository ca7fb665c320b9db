//! Generic CRUD engine shared by every resource category
//!
//! A [`Manager`] knows how to talk to one category of the API: it builds
//! requests, unwraps response envelopes, turns items into [`Resource`]s and
//! records their identifiers in the completion cache. The per-category
//! managers in [`crate::v1`] only supply URLs and payload shapes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::cache::{CacheHandle, CacheMode, CacheType, CompletionCache};
use crate::error::{ApiError, Result, check_response};
use crate::finder::ResourceLookup;
use crate::http::{ApiResponse, HttpClient, Method};
use crate::pagination::{Paginated, envelope_links, next_marker, paginate_query};
use crate::resource::{Resource, ResourceSpec, UUID_LENGTH};

/// CRUD primitives for one resource category
pub struct Manager {
    api: Arc<dyn HttpClient>,
    spec: &'static ResourceSpec,
    cache: CompletionCache,
    active_caches: Mutex<HashMap<CacheType, CacheHandle>>,
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("category", &self.spec.category)
            .field("cache", &self.cache)
            .finish()
    }
}

impl Manager {
    pub fn new(api: Arc<dyn HttpClient>, spec: &'static ResourceSpec, cache: CompletionCache) -> Self {
        Self {
            api,
            spec,
            cache,
            active_caches: Mutex::new(HashMap::new()),
        }
    }

    pub fn api(&self) -> &Arc<dyn HttpClient> {
        &self.api
    }

    pub fn spec(&self) -> &'static ResourceSpec {
        self.spec
    }

    /// Collection path, or an error for categories only reachable through a parent
    pub fn collection(&self) -> Result<&'static str> {
        self.spec.collection.ok_or_else(|| {
            ApiError::Command(format!(
                "{} resources have no top-level collection",
                self.spec.type_name
            ))
        })
    }

    /// Construct a resource and record its identifiers in any active cache
    pub fn resource(&self, info: Map<String, Value>, loaded: bool) -> Resource {
        let resource = Resource::new(self.spec, info, loaded);

        if let Some(id) = resource.id()
            && id.len() >= UUID_LENGTH
        {
            self.write_to_completion_cache(CacheType::Uuid, id);
        }
        if let Some(human_id) = resource.human_id() {
            self.write_to_completion_cache(CacheType::HumanId, human_id);
        }

        resource
    }

    fn resource_from_value(&self, value: Value, loaded: bool) -> Result<Resource> {
        match value {
            Value::Object(info) => Ok(self.resource(info, loaded)),
            other => Resource::from_value(self.spec, other, loaded),
        }
    }

    async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<ApiResponse> {
        let response = self.api.request(method, url, body).await?;
        check_response(&response, url)?;
        Ok(response)
    }

    async fn fetch_list(&self, url: &str, body: Option<&Value>) -> Result<Value> {
        let response = match body {
            Some(body) => self.send(Method::POST, url, Some(body)).await?,
            None => self.send(Method::GET, url, None).await?,
        };
        response.body.ok_or_else(|| empty_body(url))
    }

    /// List a collection as resources; replaces the category's cache files
    pub async fn list(&self, url: &str, response_key: &str, body: Option<&Value>) -> Result<Vec<Resource>> {
        let data = self.fetch_list(url, body).await?;
        self.resources_from_body(data, response_key, url)
    }

    /// Resources of an already fetched list envelope; replaces the
    /// category's cache files
    pub fn resources_from_body(&self, body: Value, response_key: &str, url: &str) -> Result<Vec<Resource>> {
        let _caches = self.completion_caches(CacheMode::Truncate);
        self.resources_in_envelope(body, response_key, url)
    }

    /// Resources of a list envelope without replacing the cache files; ids
    /// only reach caches a caller already holds open
    pub fn resources_in_envelope(&self, body: Value, response_key: &str, url: &str) -> Result<Vec<Resource>> {
        unwrap_items(body, response_key, url)?
            .into_iter()
            .map(|item| self.resource_from_value(item, false))
            .collect()
    }

    /// List a collection, building each item with `build` instead of a
    /// resource of this category
    pub async fn list_with<T, F>(
        &self,
        url: &str,
        response_key: &str,
        body: Option<&Value>,
        build: F,
    ) -> Result<Vec<T>>
    where
        F: FnMut(Value) -> Result<T>,
    {
        let data = self.fetch_list(url, body).await?;
        unwrap_items(data, response_key, url)?
            .into_iter()
            .map(build)
            .collect()
    }

    /// Fetch one page; `limit` and `marker` are only sent when present
    pub async fn paginated(
        &self,
        url: &str,
        response_key: &str,
        limit: Option<u32>,
        marker: Option<&str>,
    ) -> Result<Paginated<Resource>> {
        let _caches = self.completion_caches(CacheMode::Truncate);
        self.fetch_page(url, response_key, limit, marker).await
    }

    async fn fetch_page(
        &self,
        url: &str,
        response_key: &str,
        limit: Option<u32>,
        marker: Option<&str>,
    ) -> Result<Paginated<Resource>> {
        let url = paginate_query(url, limit, marker);
        let data = self.fetch_list(&url, None).await?;

        let links = envelope_links(&data, response_key);
        let next = next_marker(&links);
        let items = self.resources_in_envelope(data, response_key, &url)?;

        Ok(Paginated::new(items, next, links))
    }

    /// Follow `next` markers until the last page.
    ///
    /// The cache files are replaced once and then hold every page's ids.
    pub async fn paginated_all(&self, url: &str, response_key: &str) -> Result<Vec<Resource>> {
        let _caches = self.completion_caches(CacheMode::Truncate);
        let mut all = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self
                .fetch_page(url, response_key, None, marker.as_deref())
                .await?;
            trace!("Fetched page of {} {}", page.len(), response_key);

            let next = page.next.clone();
            all.extend(page);

            match next {
                Some(next) if marker.as_deref() != Some(next.as_str()) => marker = Some(next),
                Some(next) => {
                    debug!("Server repeated marker {}; stopping pagination", next);
                    break;
                }
                None => break,
            }
        }

        Ok(all)
    }

    /// GET one resource unwrapped from `response_key`
    pub async fn get(&self, url: &str, response_key: &str) -> Result<Resource> {
        let data = self.get_raw(url, Some(response_key)).await?;
        self.resource_from_value(data, true)
    }

    /// GET the body, unwrapped from `response_key` when given
    pub async fn get_raw(&self, url: &str, response_key: Option<&str>) -> Result<Value> {
        let response = self.send(Method::GET, url, None).await?;
        let body = response.body.ok_or_else(|| empty_body(url))?;
        match response_key {
            Some(key) => take_key(body, key, url),
            None => Ok(body),
        }
    }

    /// POST and wrap the created item; its ids are appended to the cache
    pub async fn create(&self, url: &str, body: &Value, response_key: &str) -> Result<Resource> {
        let data = self.create_raw(url, Some(body), response_key).await?;

        let _caches = self.completion_caches(CacheMode::Append);
        self.resource_from_value(data, false)
    }

    /// POST and return the unwrapped item verbatim, bypassing resources and
    /// the cache (used for responses carrying secrets)
    pub async fn create_raw(
        &self,
        url: &str,
        body: Option<&Value>,
        response_key: &str,
    ) -> Result<Value> {
        let response = self.send(Method::POST, url, body).await?;
        let data = response.body.ok_or_else(|| empty_body(url))?;
        take_key(data, response_key, url)
    }

    /// POST to an endpoint whose response is not a resource of this category
    pub async fn post(&self, url: &str, body: &Value) -> Result<Option<Value>> {
        let response = self.send(Method::POST, url, Some(body)).await?;
        Ok(response.body)
    }

    /// PUT (full replace)
    pub async fn update(&self, url: &str, body: &Value, response_key: Option<&str>) -> Result<Option<Value>> {
        let response = self.send(Method::PUT, url, Some(body)).await?;
        unwrap_optional(response.body, response_key, url)
    }

    /// PATCH (partial merge)
    pub async fn edit(&self, url: &str, body: &Value, response_key: Option<&str>) -> Result<Option<Value>> {
        let response = self.send(Method::PATCH, url, Some(body)).await?;
        unwrap_optional(response.body, response_key, url)
    }

    pub async fn delete(&self, url: &str) -> Result<()> {
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    /// POST `{"<verb>": {...}}` to `<collection>/<id>/action`
    pub async fn action(&self, id: &str, body: &Value) -> Result<Option<Resource>> {
        let url = format!("{}/{}/action", self.collection()?, id);
        let response = self.send(Method::POST, &url, Some(body)).await?;

        match response.body {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(mut map)) => {
                let item = map
                    .remove(self.spec.singular)
                    .unwrap_or(Value::Object(map));
                self.resource_from_value(item, true).map(Some)
            }
            Some(other) => Err(ApiError::UnexpectedResponse {
                url,
                message: format!("expected an object, got {}", other),
            }),
        }
    }

    /// Make `cache_type` writable for the lifetime of the returned scope.
    ///
    /// Never fails: when the file cannot be opened the scope is inert and
    /// writes are dropped.
    pub fn completion_cache(&self, cache_type: CacheType, mode: CacheMode) -> CacheScope<'_> {
        let handle = self.cache.open(self.spec.category, cache_type, mode);
        let previous = match self.active_caches.lock() {
            Ok(mut active) => {
                let previous = active.remove(&cache_type);
                if let Some(handle) = handle {
                    active.insert(cache_type, handle);
                }
                previous
            }
            Err(e) => {
                debug!("Completion cache registry unavailable: {}", e);
                None
            }
        };

        CacheScope {
            manager: self,
            cache_type,
            previous,
        }
    }

    fn completion_caches(&self, mode: CacheMode) -> [CacheScope<'_>; 2] {
        CacheType::ALL.map(|cache_type| self.completion_cache(cache_type, mode))
    }

    /// Append `value` to the cache of `cache_type` if a scope has it open
    pub fn write_to_completion_cache(&self, cache_type: CacheType, value: &str) {
        match self.active_caches.lock() {
            Ok(mut active) => {
                if let Some(handle) = active.get_mut(&cache_type) {
                    handle.write_line(value);
                }
            }
            Err(e) => debug!("Completion cache registry unavailable: {}", e),
        }
    }
}

/// Keeps a completion cache file open; restores the previous handle on drop
pub struct CacheScope<'a> {
    manager: &'a Manager,
    cache_type: CacheType,
    previous: Option<CacheHandle>,
}

impl CacheScope<'_> {
    pub fn is_active(&self) -> bool {
        self.manager
            .active_caches
            .lock()
            .map(|active| active.contains_key(&self.cache_type))
            .unwrap_or(false)
    }
}

impl Drop for CacheScope<'_> {
    fn drop(&mut self) {
        if let Ok(mut active) = self.manager.active_caches.lock() {
            active.remove(&self.cache_type);
            if let Some(previous) = self.previous.take() {
                active.insert(self.cache_type, previous);
            }
        }
    }
}

fn empty_body(url: &str) -> ApiError {
    ApiError::UnexpectedResponse {
        url: url.to_string(),
        message: "response has no body".to_string(),
    }
}

fn take_key(body: Value, key: &str, url: &str) -> Result<Value> {
    match body {
        Value::Object(mut map) => map.remove(key).ok_or_else(|| ApiError::UnexpectedResponse {
            url: url.to_string(),
            message: format!("missing '{}' in response", key),
        }),
        other => Err(ApiError::UnexpectedResponse {
            url: url.to_string(),
            message: format!("expected an object with '{}', got {}", key, other),
        }),
    }
}

fn unwrap_optional(body: Option<Value>, response_key: Option<&str>, url: &str) -> Result<Option<Value>> {
    match (body, response_key) {
        (None, _) => Ok(None),
        (Some(body), Some(key)) => take_key(body, key, url).map(Some),
        (Some(body), None) => Ok(Some(body)),
    }
}

/// Items of a list envelope.
///
/// `{"values": [...]}` is a nested envelope. Any other mapping contributes
/// its values as the items, which some endpoints rely on.
fn unwrap_items(body: Value, response_key: &str, url: &str) -> Result<Vec<Value>> {
    let items = match take_key(body, response_key, url)? {
        Value::Object(mut map) => match map.remove("values") {
            Some(Value::Array(values)) => values,
            Some(other) => vec![other],
            None => map.into_iter().map(|(_, v)| v).collect(),
        },
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            return Err(ApiError::UnexpectedResponse {
                url: url.to_string(),
                message: format!("expected a list under '{}', got {}", response_key, other),
            });
        }
    };

    Ok(items.into_iter().filter(|item| !item.is_null()).collect())
}

#[async_trait]
impl ResourceLookup for Manager {
    fn spec(&self) -> &'static ResourceSpec {
        self.spec
    }

    fn supports_get(&self) -> bool {
        self.spec.collection.is_some()
    }

    async fn get(&self, id: &str) -> Result<Resource> {
        let url = format!("{}/{}", self.collection()?, id);
        Manager::get(self, &url, self.spec.singular).await
    }

    async fn list_all(&self) -> Result<Vec<Resource>> {
        self.paginated_all(self.collection()?, self.spec.plural)
            .await
    }
}
