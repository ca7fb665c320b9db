//! Instance sizes (`/flavors`)

use std::sync::Arc;

use crate::cache::CompletionCache;
use crate::error::Result;
use crate::http::HttpClient;
use crate::manager::Manager;
use crate::resource::{Resource, ResourceId, ResourceSpec, getid};
use crate::v1::delegate_lookup;

pub static FLAVOR: ResourceSpec = ResourceSpec::new("flavor", "Flavor", "flavor", "flavors")
    .collection("/flavors")
    .display_attr("name");

#[derive(Debug)]
pub struct Flavors {
    manager: Manager,
}

impl Flavors {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            manager: Manager::new(api, &FLAVOR, cache),
        }
    }

    pub async fn list(&self) -> Result<Vec<Resource>> {
        self.manager.list("/flavors", "flavors", None).await
    }

    pub async fn get(&self, flavor: &(impl ResourceId + ?Sized)) -> Result<Resource> {
        self.manager
            .get(&format!("/flavors/{}", getid(flavor)?), "flavor")
            .await
    }
}

delegate_lookup!(Flavors);
