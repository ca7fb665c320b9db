//! Instance backups (`/backups`)

use std::sync::Arc;

use serde_json::{Map, json};

use crate::cache::CompletionCache;
use crate::error::Result;
use crate::http::HttpClient;
use crate::manager::Manager;
use crate::pagination::Paginated;
use crate::resource::{Resource, ResourceId, ResourceSpec, getid};
use crate::v1::delegate_lookup;

pub static BACKUP: ResourceSpec = ResourceSpec::new("backup", "Backup", "backup", "backups")
    .collection("/backups")
    .human_id()
    .display_attr("name");

#[derive(Debug)]
pub struct Backups {
    manager: Manager,
}

impl Backups {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            manager: Manager::new(api, &BACKUP, cache),
        }
    }

    pub async fn list(&self, limit: Option<u32>, marker: Option<&str>) -> Result<Paginated<Resource>> {
        self.manager
            .paginated("/backups", "backups", limit, marker)
            .await
    }

    pub async fn get(&self, backup: &(impl ResourceId + ?Sized)) -> Result<Resource> {
        self.manager
            .get(&format!("/backups/{}", getid(backup)?), "backup")
            .await
    }

    /// Start a backup of `instance`
    pub async fn create(
        &self,
        name: &str,
        instance: &(impl ResourceId + ?Sized),
        description: Option<&str>,
    ) -> Result<Resource> {
        let mut backup = Map::new();
        backup.insert("name".into(), json!(name));
        backup.insert("instance".into(), json!(getid(instance)?));
        if let Some(description) = description {
            backup.insert("description".into(), json!(description));
        }

        self.manager
            .create("/backups", &json!({ "backup": backup }), "backup")
            .await
    }

    pub async fn delete(&self, backup: &(impl ResourceId + ?Sized)) -> Result<()> {
        self.manager
            .delete(&format!("/backups/{}", getid(backup)?))
            .await
    }
}

delegate_lookup!(Backups);
