//! Configuration groups (`/configurations`) and the parameters a
//! datastore version accepts

use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::cache::CompletionCache;
use crate::error::Result;
use crate::http::HttpClient;
use crate::manager::Manager;
use crate::pagination::Paginated;
use crate::resource::{Resource, ResourceId, ResourceSpec, getid};
use crate::v1::delegate_lookup;
use crate::v1::instances::INSTANCE;

pub static CONFIGURATION: ResourceSpec =
    ResourceSpec::new("configuration", "Configuration", "configuration", "configurations")
        .collection("/configurations")
        .human_id()
        .display_attr("name");

pub static CONFIGURATION_PARAMETER: ResourceSpec = ResourceSpec::new(
    "configuration-parameter",
    "ConfigurationParameter",
    "configuration-parameter",
    "configuration-parameters",
)
.display_attr("name");

/// Parameters for [`Configurations::create`]
#[derive(Debug, Clone, Default)]
pub struct NewConfiguration {
    pub name: String,
    /// Parameter name to value
    pub values: Value,
    pub description: Option<String>,
    pub datastore: Option<String>,
    pub datastore_version: Option<String>,
}

impl NewConfiguration {
    pub fn new(name: impl Into<String>, values: Value) -> Self {
        Self {
            name: name.into(),
            values,
            ..Default::default()
        }
    }

    fn to_body(&self) -> Value {
        let mut configuration = Map::new();
        configuration.insert("name".into(), json!(self.name));
        configuration.insert("values".into(), self.values.clone());
        if let Some(description) = &self.description {
            configuration.insert("description".into(), json!(description));
        }
        if self.datastore.is_some() || self.datastore_version.is_some() {
            let mut datastore = Map::new();
            if let Some(kind) = &self.datastore {
                datastore.insert("type".into(), json!(kind));
            }
            if let Some(version) = &self.datastore_version {
                datastore.insert("version".into(), json!(version));
            }
            configuration.insert("datastore".into(), Value::Object(datastore));
        }
        json!({ "configuration": configuration })
    }
}

/// Manage configuration groups
#[derive(Debug)]
pub struct Configurations {
    manager: Manager,
    instances: Manager,
}

impl Configurations {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            instances: Manager::new(api.clone(), &INSTANCE, cache.clone()),
            manager: Manager::new(api, &CONFIGURATION, cache),
        }
    }

    fn url(configuration: &(impl ResourceId + ?Sized)) -> Result<String> {
        Ok(format!("/configurations/{}", getid(configuration)?))
    }

    pub async fn list(&self, limit: Option<u32>, marker: Option<&str>) -> Result<Paginated<Resource>> {
        self.manager
            .paginated("/configurations", "configurations", limit, marker)
            .await
    }

    pub async fn get(&self, configuration: &(impl ResourceId + ?Sized)) -> Result<Resource> {
        self.manager
            .get(&Self::url(configuration)?, "configuration")
            .await
    }

    /// Instances the group is attached to
    pub async fn instances(
        &self,
        configuration: &(impl ResourceId + ?Sized),
        limit: Option<u32>,
        marker: Option<&str>,
    ) -> Result<Paginated<Resource>> {
        let url = format!("{}/instances", Self::url(configuration)?);
        self.instances
            .paginated(&url, "instances", limit, marker)
            .await
    }

    pub async fn create(&self, params: &NewConfiguration) -> Result<Resource> {
        self.manager
            .create("/configurations", &params.to_body(), "configuration")
            .await
    }

    /// Replace all values of the group, optionally renaming it
    pub async fn update(
        &self,
        configuration: &(impl ResourceId + ?Sized),
        values: &Value,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<()> {
        let mut body = Map::new();
        body.insert("values".into(), values.clone());
        if let Some(name) = name {
            body.insert("name".into(), json!(name));
        }
        if let Some(description) = description {
            body.insert("description".into(), json!(description));
        }

        self.manager
            .update(&Self::url(configuration)?, &json!({ "configuration": body }), None)
            .await?;
        Ok(())
    }

    /// Merge `values` into the group
    pub async fn edit(&self, configuration: &(impl ResourceId + ?Sized), values: &Value) -> Result<()> {
        let body = json!({"configuration": {"values": values}});
        self.manager
            .edit(&Self::url(configuration)?, &body, None)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, configuration: &(impl ResourceId + ?Sized)) -> Result<()> {
        self.manager.delete(&Self::url(configuration)?).await
    }
}

delegate_lookup!(Configurations);

/// Parameters a datastore version accepts in configuration groups
#[derive(Debug)]
pub struct ConfigurationParameters {
    manager: Manager,
}

impl ConfigurationParameters {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            manager: Manager::new(api, &CONFIGURATION_PARAMETER, cache),
        }
    }

    fn url(datastore: &str, version: &str) -> String {
        format!("/datastores/{}/versions/{}/parameters", datastore, version)
    }

    pub async fn parameters(&self, datastore: &str, version: &str) -> Result<Vec<Resource>> {
        self.manager
            .list(&Self::url(datastore, version), "configuration-parameters", None)
            .await
    }

    pub async fn get_parameter(&self, datastore: &str, version: &str, key: &str) -> Result<Resource> {
        let url = format!("{}/{}", Self::url(datastore, version), key);
        let body = self.manager.get_raw(&url, None).await?;
        Resource::from_value(&CONFIGURATION_PARAMETER, body, true)
    }
}
