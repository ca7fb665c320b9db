//! Database instances (`/instances`)

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::cache::CompletionCache;
use crate::error::Result;
use crate::http::HttpClient;
use crate::manager::Manager;
use crate::pagination::Paginated;
use crate::resource::{Resource, ResourceId, ResourceSpec, getid};
use crate::v1::backups::BACKUP;
use crate::v1::delegate_lookup;
use crate::v1::users::NewUser;

pub static INSTANCE: ResourceSpec = ResourceSpec::new("instance", "Instance", "instance", "instances")
    .collection("/instances")
    .human_id()
    .prefix_lookup()
    .display_attr("name");

/// Instance lifecycle states reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstanceStatus {
    Active,
    Blocked,
    Build,
    Failed,
    Reboot,
    Resize,
    Shutdown,
    RestartRequired,
    /// Any state this client does not know about yet
    Other(String),
}

impl InstanceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InstanceStatus::Active => "ACTIVE",
            InstanceStatus::Blocked => "BLOCKED",
            InstanceStatus::Build => "BUILD",
            InstanceStatus::Failed => "FAILED",
            InstanceStatus::Reboot => "REBOOT",
            InstanceStatus::Resize => "RESIZE",
            InstanceStatus::Shutdown => "SHUTDOWN",
            InstanceStatus::RestartRequired => "RESTART_REQUIRED",
            InstanceStatus::Other(status) => status,
        }
    }

    /// Status of an instance resource, if it carries one
    pub fn of(instance: &Resource) -> Option<Self> {
        instance.str_attr("status").map(Self::from)
    }
}

impl From<&str> for InstanceStatus {
    fn from(status: &str) -> Self {
        match status {
            "ACTIVE" => InstanceStatus::Active,
            "BLOCKED" => InstanceStatus::Blocked,
            "BUILD" => InstanceStatus::Build,
            "FAILED" => InstanceStatus::Failed,
            "REBOOT" => InstanceStatus::Reboot,
            "RESIZE" => InstanceStatus::Resize,
            "SHUTDOWN" => InstanceStatus::Shutdown,
            "RESTART_REQUIRED" => InstanceStatus::RestartRequired,
            other => InstanceStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for InstanceStatus {
    fn from(status: String) -> Self {
        Self::from(status.as_str())
    }
}

impl From<InstanceStatus> for String {
    fn from(status: InstanceStatus) -> Self {
        status.as_str().to_string()
    }
}

impl FromStr for InstanceStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for [`Instances::create`]
#[derive(Debug, Clone, Default)]
pub struct NewInstance {
    pub name: String,
    pub flavor: String,
    pub volume_size: Option<u32>,
    pub databases: Vec<String>,
    pub users: Vec<NewUser>,
    /// Backup to restore from
    pub restore_point: Option<String>,
    pub availability_zone: Option<String>,
    pub datastore: Option<String>,
    pub datastore_version: Option<String>,
    pub nics: Vec<Value>,
    pub configuration: Option<String>,
    /// Source instance when creating a replica
    pub replica_of: Option<String>,
}

impl NewInstance {
    pub fn new(name: impl Into<String>, flavor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flavor: flavor.into(),
            ..Default::default()
        }
    }

    /// Request body; optional fields are only present when set
    pub fn to_body(&self) -> Value {
        let mut instance = Map::new();
        instance.insert("name".into(), json!(self.name));
        instance.insert("flavorRef".into(), json!(self.flavor));

        if let Some(size) = self.volume_size {
            instance.insert("volume".into(), json!({"size": size}));
        }
        if !self.databases.is_empty() {
            let databases: Vec<Value> = self.databases.iter().map(|name| json!({"name": name})).collect();
            instance.insert("databases".into(), Value::Array(databases));
        }
        if !self.users.is_empty() {
            let users: Vec<Value> = self.users.iter().map(NewUser::to_value).collect();
            instance.insert("users".into(), Value::Array(users));
        }
        if let Some(backup) = &self.restore_point {
            instance.insert("restorePoint".into(), json!({"backupRef": backup}));
        }
        if let Some(zone) = &self.availability_zone {
            instance.insert("availability_zone".into(), json!(zone));
        }
        if self.datastore.is_some() || self.datastore_version.is_some() {
            let mut datastore = Map::new();
            if let Some(kind) = &self.datastore {
                datastore.insert("type".into(), json!(kind));
            }
            if let Some(version) = &self.datastore_version {
                datastore.insert("version".into(), json!(version));
            }
            instance.insert("datastore".into(), Value::Object(datastore));
        }
        if !self.nics.is_empty() {
            instance.insert("nics".into(), Value::Array(self.nics.clone()));
        }
        if let Some(configuration) = &self.configuration {
            instance.insert("configuration".into(), json!(configuration));
        }
        if let Some(source) = &self.replica_of {
            instance.insert("replica_of".into(), json!(source));
        }

        json!({ "instance": instance })
    }
}

/// Partial update for [`Instances::edit`]
#[derive(Debug, Clone, Default)]
pub struct InstanceEdit {
    pub name: Option<String>,
    pub configuration: Option<String>,
    /// Send `"configuration": null`, detaching the current group
    pub remove_configuration: bool,
}

impl InstanceEdit {
    pub fn to_body(&self) -> Value {
        let mut instance = Map::new();
        if let Some(name) = &self.name {
            instance.insert("name".into(), json!(name));
        }
        if let Some(configuration) = &self.configuration {
            instance.insert("configuration".into(), json!(configuration));
        } else if self.remove_configuration {
            instance.insert("configuration".into(), Value::Null);
        }
        json!({ "instance": instance })
    }
}

/// Manage database instances
#[derive(Debug)]
pub struct Instances {
    manager: Manager,
    backups: Manager,
}

impl Instances {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            backups: Manager::new(api.clone(), &BACKUP, cache.clone()),
            manager: Manager::new(api, &INSTANCE, cache),
        }
    }

    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    fn url(instance: &(impl ResourceId + ?Sized)) -> Result<String> {
        Ok(format!("/instances/{}", getid(instance)?))
    }

    /// One page of instances
    pub async fn list(&self, limit: Option<u32>, marker: Option<&str>) -> Result<Paginated<Resource>> {
        self.manager
            .paginated("/instances", "instances", limit, marker)
            .await
    }

    /// Every instance, following pagination markers
    pub async fn list_all(&self) -> Result<Vec<Resource>> {
        self.manager.paginated_all("/instances", "instances").await
    }

    pub async fn get(&self, instance: &(impl ResourceId + ?Sized)) -> Result<Resource> {
        self.manager.get(&Self::url(instance)?, "instance").await
    }

    pub async fn create(&self, params: &NewInstance) -> Result<Resource> {
        self.manager
            .create("/instances", &params.to_body(), "instance")
            .await
    }

    /// Attach (`Some`) or detach (`None`) a configuration group with a PUT
    pub async fn modify(
        &self,
        instance: &(impl ResourceId + ?Sized),
        configuration: Option<&str>,
    ) -> Result<()> {
        let body = match configuration {
            Some(configuration) => json!({"instance": {"configuration": configuration}}),
            None => json!({"instance": {}}),
        };
        self.manager.update(&Self::url(instance)?, &body, None).await?;
        Ok(())
    }

    pub async fn edit(&self, instance: &(impl ResourceId + ?Sized), changes: &InstanceEdit) -> Result<()> {
        self.manager
            .edit(&Self::url(instance)?, &changes.to_body(), None)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, instance: &(impl ResourceId + ?Sized)) -> Result<()> {
        self.manager.delete(&Self::url(instance)?).await
    }

    pub async fn resize_volume(&self, instance: &(impl ResourceId + ?Sized), size: u32) -> Result<()> {
        let body = json!({"resize": {"volume": {"size": size}}});
        self.manager.action(&getid(instance)?, &body).await?;
        Ok(())
    }

    pub async fn resize_instance(&self, instance: &(impl ResourceId + ?Sized), flavor: &str) -> Result<()> {
        let body = json!({"resize": {"flavorRef": flavor}});
        self.manager.action(&getid(instance)?, &body).await?;
        Ok(())
    }

    pub async fn restart(&self, instance: &(impl ResourceId + ?Sized)) -> Result<()> {
        self.manager
            .action(&getid(instance)?, &json!({"restart": {}}))
            .await?;
        Ok(())
    }

    /// Effective configuration values of an instance
    pub async fn configuration(&self, instance: &(impl ResourceId + ?Sized)) -> Result<Resource> {
        self.manager
            .get(&format!("{}/configuration", Self::url(instance)?), "instance")
            .await
    }

    /// Backups taken of one instance
    pub async fn backups(
        &self,
        instance: &(impl ResourceId + ?Sized),
        limit: Option<u32>,
        marker: Option<&str>,
    ) -> Result<Paginated<Resource>> {
        self.backups
            .paginated(&format!("{}/backups", Self::url(instance)?), "backups", limit, marker)
            .await
    }
}

delegate_lookup!(Instances);
