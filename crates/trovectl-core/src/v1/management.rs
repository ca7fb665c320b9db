//! Operator-only endpoints (`/mgmt/...`)

use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::cache::CompletionCache;
use crate::error::{ApiError, Result};
use crate::http::HttpClient;
use crate::manager::Manager;
use crate::pagination::{Paginated, append_query};
use crate::resource::{Resource, ResourceId, ResourceSpec, getid};
use crate::v1::flavors::FLAVOR;

pub static MGMT_INSTANCE: ResourceSpec =
    ResourceSpec::new("mgmt-instance", "Instance", "instance", "instances")
        .collection("/mgmt/instances")
        .display_attr("name");

pub static ROOT_HISTORY: ResourceSpec =
    ResourceSpec::new("root-history", "RootHistory", "root_history", "root_histories")
        .display_attr("id");

/// Instance administration across tenants
#[derive(Debug)]
pub struct Management {
    manager: Manager,
}

impl Management {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            manager: Manager::new(api, &MGMT_INSTANCE, cache),
        }
    }

    /// Detailed view of one instance, including host and server details
    pub async fn show(&self, instance: &(impl ResourceId + ?Sized)) -> Result<Resource> {
        self.manager
            .get(&format!("/mgmt/instances/{}", getid(instance)?), "instance")
            .await
    }

    /// All instances, optionally filtered on whether they are deleted
    pub async fn index(
        &self,
        deleted: Option<bool>,
        limit: Option<u32>,
        marker: Option<&str>,
    ) -> Result<Paginated<Resource>> {
        let url = append_query("/mgmt/instances", &[("deleted", deleted.map(|d| d.to_string()))]);
        self.manager
            .paginated(&url, "instances", limit, marker)
            .await
    }

    /// When root was enabled on an instance, and by whom
    pub async fn root_enabled_history(&self, instance: &(impl ResourceId + ?Sized)) -> Result<Resource> {
        let url = format!("/mgmt/instances/{}/root", getid(instance)?);
        let response = self.manager.api().get(&url).await?;
        crate::error::check_response(&response, &url)?;

        match response.body {
            Some(Value::Object(mut body)) if !body.is_empty() => {
                let history = body.remove("root_history").ok_or_else(|| ApiError::UnexpectedResponse {
                    url: url.clone(),
                    message: "missing 'root_history' in response".to_string(),
                })?;
                Resource::from_value(&ROOT_HISTORY, history, true)
            }
            _ => Err(ApiError::UnexpectedResponse {
                message: format!("Call to {} did not return a body.", url),
                url,
            }),
        }
    }

    async fn action(&self, instance: &(impl ResourceId + ?Sized), body: Value) -> Result<()> {
        self.manager.action(&getid(instance)?, &body).await?;
        Ok(())
    }

    pub async fn stop(&self, instance: &(impl ResourceId + ?Sized)) -> Result<()> {
        self.action(instance, json!({"stop": {}})).await
    }

    /// Reboot the underlying OS
    pub async fn reboot(&self, instance: &(impl ResourceId + ?Sized)) -> Result<()> {
        self.action(instance, json!({"reboot": {}})).await
    }

    /// Move the instance to another compute host, or let the scheduler pick one
    pub async fn migrate(&self, instance: &(impl ResourceId + ?Sized), host: Option<&str>) -> Result<()> {
        let body = match host {
            Some(host) => json!({"migrate": {"host": host}}),
            None => json!({"migrate": {}}),
        };
        self.action(instance, body).await
    }

    /// Update the guest agent
    pub async fn update(&self, instance: &(impl ResourceId + ?Sized)) -> Result<()> {
        self.action(instance, json!({"update": {}})).await
    }

    /// Clear a stuck task status
    pub async fn reset_task_status(&self, instance: &(impl ResourceId + ?Sized)) -> Result<()> {
        self.action(instance, json!({"reset-task-status": {}})).await
    }
}

/// Parameters for [`MgmtFlavors::create`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewFlavor {
    pub name: String,
    pub ram: u32,
    pub disk: u32,
    pub vcpus: u32,
    /// `auto` lets the service pick an id
    pub flavor_id: String,
    pub ephemeral: Option<u32>,
    pub swap: Option<u32>,
    pub rxtx_factor: Option<String>,
    pub service_type: Option<String>,
}

impl NewFlavor {
    pub fn new(name: impl Into<String>, ram: u32, disk: u32, vcpus: u32) -> Self {
        Self {
            name: name.into(),
            ram,
            disk,
            vcpus,
            flavor_id: "auto".to_string(),
            ephemeral: None,
            swap: None,
            rxtx_factor: None,
            service_type: None,
        }
    }

    fn to_body(&self) -> Value {
        let mut flavor = Map::new();
        flavor.insert("flavor_id".into(), json!(self.flavor_id));
        flavor.insert("name".into(), json!(self.name));
        flavor.insert("ram".into(), json!(self.ram));
        flavor.insert("disk".into(), json!(self.disk));
        flavor.insert("vcpu".into(), json!(self.vcpus));
        flavor.insert("ephemeral".into(), json!(self.ephemeral.unwrap_or(0)));
        flavor.insert("swap".into(), json!(self.swap.unwrap_or(0)));
        flavor.insert(
            "rxtx_factor".into(),
            json!(self.rxtx_factor.as_deref().unwrap_or("1.0")),
        );
        flavor.insert("is_public".into(), json!("True"));
        if let Some(service_type) = &self.service_type {
            flavor.insert("service_type".into(), json!(service_type));
        }
        json!({ "flavor": flavor })
    }
}

/// Flavor administration
#[derive(Debug)]
pub struct MgmtFlavors {
    manager: Manager,
}

impl MgmtFlavors {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            manager: Manager::new(api, &FLAVOR, cache),
        }
    }

    pub async fn create(&self, params: &NewFlavor) -> Result<Resource> {
        self.manager
            .create("/mgmt/flavors", &params.to_body(), "flavor")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeHttpClient;
    use crate::http::Method;
    use crate::v1::test_support::{api, no_cache};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_index_deleted_filter() {
        let (api, fake) = api(
            FakeHttpClient::new()
                .on(Method::GET, "/mgmt/instances", 200, Some(json!({"instances": []})))
                .on(
                    Method::GET,
                    "/mgmt/instances?deleted=true&limit=2",
                    200,
                    Some(json!({"instances": [{"id": "i1"}]})),
                )
                .on(
                    Method::GET,
                    "/mgmt/instances?deleted=false",
                    200,
                    Some(json!({"instances": []})),
                ),
        );
        let mgmt = Management::new(api, no_cache());

        assert!(mgmt.index(None, None, None).await.unwrap().is_empty());
        assert_eq!(mgmt.index(Some(true), Some(2), None).await.unwrap().len(), 1);
        assert!(mgmt.index(Some(false), None, None).await.unwrap().is_empty());

        let urls: Vec<String> = fake.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "/mgmt/instances",
                "/mgmt/instances?deleted=true&limit=2",
                "/mgmt/instances?deleted=false"
            ]
        );
    }

    #[tokio::test]
    async fn test_actions() {
        let (api, fake) = api(FakeHttpClient::new().on(Method::POST, "/mgmt/instances/i1/action", 202, None));
        let mgmt = Management::new(api, no_cache());

        mgmt.stop("i1").await.unwrap();
        mgmt.reboot("i1").await.unwrap();
        mgmt.migrate("i1", None).await.unwrap();
        mgmt.migrate("i1", Some("compute-2")).await.unwrap();
        mgmt.update("i1").await.unwrap();
        mgmt.reset_task_status("i1").await.unwrap();

        let bodies: Vec<Value> = fake
            .requests()
            .into_iter()
            .filter_map(|r| r.body)
            .collect();
        assert_eq!(
            bodies,
            vec![
                json!({"stop": {}}),
                json!({"reboot": {}}),
                json!({"migrate": {}}),
                json!({"migrate": {"host": "compute-2"}}),
                json!({"update": {}}),
                json!({"reset-task-status": {}}),
            ]
        );
    }

    #[tokio::test]
    async fn test_root_history() {
        let (api, _) = api(
            FakeHttpClient::new()
                .on(
                    Method::GET,
                    "/mgmt/instances/i1/root",
                    200,
                    Some(json!({"root_history": {"id": "i1", "created": "2014-01-01", "user": "admin"}})),
                )
                .on(Method::GET, "/mgmt/instances/i2/root", 200, None),
        );
        let mgmt = Management::new(api, no_cache());

        let history = mgmt.root_enabled_history("i1").await.unwrap();
        assert_eq!(history.str_attr("user"), Some("admin"));

        let err = mgmt.root_enabled_history("i2").await.unwrap_err();
        assert!(err.to_string().contains("did not return a body"));
    }

    #[tokio::test]
    async fn test_flavor_create_defaults() {
        let (api, fake) = api(FakeHttpClient::new().on(
            Method::POST,
            "/mgmt/flavors",
            200,
            Some(json!({"flavor": {"id": 10, "name": "big"}})),
        ));
        let flavors = MgmtFlavors::new(api, no_cache());

        flavors.create(&NewFlavor::new("big", 4096, 20, 2)).await.unwrap();

        assert_eq!(
            fake.last_request().body,
            Some(json!({"flavor": {
                "flavor_id": "auto",
                "name": "big",
                "ram": 4096,
                "disk": 20,
                "vcpu": 2,
                "ephemeral": 0,
                "swap": 0,
                "rxtx_factor": "1.0",
                "is_public": "True"
            }}))
        );
    }
}
