//! Absolute and rate limits of the tenant (`/limits`)

use std::sync::Arc;

use serde_json::Value;

use crate::cache::CompletionCache;
use crate::error::{ApiError, Result};
use crate::http::HttpClient;
use crate::manager::Manager;
use crate::resource::{Resource, ResourceSpec};

pub static LIMIT: ResourceSpec = ResourceSpec::new("limit", "Limit", "limit", "limits").display_attr("verb");

#[derive(Debug)]
pub struct Limits {
    manager: Manager,
}

impl Limits {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            manager: Manager::new(api, &LIMIT, cache),
        }
    }

    /// Fetch the limits. Only an HTTP 200 with a body counts as success.
    pub async fn list(&self) -> Result<Vec<Resource>> {
        let url = "/limits";
        let response = self.manager.api().get(url).await?;

        if response.status != 200 {
            return Err(match response.status {
                status if status >= 400 => ApiError::from_response(status, response.body.as_ref(), url),
                status => ApiError::UnexpectedResponse {
                    url: url.to_string(),
                    message: format!("expected HTTP 200, got {}", status),
                },
            });
        }

        let body = match response.body {
            Some(body) if !is_empty(&body) => body,
            _ => {
                return Err(ApiError::UnexpectedResponse {
                    url: url.to_string(),
                    message: "Call to /limits did not return a body.".to_string(),
                });
            }
        };

        // limits carry no ids, so there is nothing to cache
        self.manager.resources_in_envelope(body, "limits", url)
    }
}

fn is_empty(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
