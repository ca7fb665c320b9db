//! Root access of an instance (`/instances/{id}/root`)

use std::sync::Arc;

use serde_json::Value;

use crate::cache::CompletionCache;
use crate::error::{ApiError, Result};
use crate::http::HttpClient;
use crate::manager::Manager;
use crate::resource::{ResourceId, getid};
use crate::v1::users::USER;

/// Enable and inspect the root user
#[derive(Debug)]
pub struct Root {
    manager: Manager,
}

impl Root {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            manager: Manager::new(api, &USER, cache),
        }
    }

    fn url(instance: &(impl ResourceId + ?Sized)) -> Result<String> {
        Ok(format!("/instances/{}/root", getid(instance)?))
    }

    /// Enable root and return `(name, password)`.
    ///
    /// The generated password is returned as-is and never wrapped in a
    /// resource, so it does not reach the completion cache.
    pub async fn create(&self, instance: &(impl ResourceId + ?Sized)) -> Result<(String, String)> {
        let url = Self::url(instance)?;
        let user = self.manager.create_raw(&url, None, "user").await?;

        let field = |name: &str| {
            user.get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| ApiError::UnexpectedResponse {
                    url: url.clone(),
                    message: format!("root user has no '{}'", name),
                })
        };

        Ok((field("name")?, field("password")?))
    }

    pub async fn is_root_enabled(&self, instance: &(impl ResourceId + ?Sized)) -> Result<bool> {
        let enabled = self
            .manager
            .get_raw(&Self::url(instance)?, Some("rootEnabled"))
            .await?;
        Ok(enabled.as_bool().unwrap_or(false))
    }
}
