//! Datastores, their versions and version membership
//! (`/datastores`, `/mgmt/datastores/.../members`)

use std::sync::Arc;

use serde_json::json;

use crate::cache::CompletionCache;
use crate::error::Result;
use crate::http::HttpClient;
use crate::manager::Manager;
use crate::pagination::Paginated;
use crate::resource::{Resource, ResourceSpec};
use crate::v1::delegate_lookup;

pub static DATASTORE: ResourceSpec = ResourceSpec::new("datastore", "Datastore", "datastore", "datastores")
    .collection("/datastores")
    .display_attr("name");

pub static DATASTORE_VERSION: ResourceSpec =
    ResourceSpec::new("datastore-version", "DatastoreVersion", "version", "versions").display_attr("name");

pub static DATASTORE_VERSION_MEMBER: ResourceSpec = ResourceSpec::new(
    "datastore-version-member",
    "DatastoreVersionMember",
    "datastore_version_member",
    "datastore_version_members",
)
.display_attr("id");

#[derive(Debug)]
pub struct Datastores {
    manager: Manager,
}

impl Datastores {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            manager: Manager::new(api, &DATASTORE, cache),
        }
    }

    pub async fn list(&self, limit: Option<u32>, marker: Option<&str>) -> Result<Paginated<Resource>> {
        self.manager
            .paginated("/datastores", "datastores", limit, marker)
            .await
    }

    pub async fn get(&self, datastore: &str) -> Result<Resource> {
        self.manager
            .get(&format!("/datastores/{}", datastore), "datastore")
            .await
    }
}

delegate_lookup!(Datastores);

#[derive(Debug)]
pub struct DatastoreVersions {
    manager: Manager,
}

impl DatastoreVersions {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            manager: Manager::new(api, &DATASTORE_VERSION, cache),
        }
    }

    pub async fn list(
        &self,
        datastore: &str,
        limit: Option<u32>,
        marker: Option<&str>,
    ) -> Result<Paginated<Resource>> {
        self.manager
            .paginated(&format!("/datastores/{}/versions", datastore), "versions", limit, marker)
            .await
    }

    pub async fn get(&self, datastore: &str, version: &str) -> Result<Resource> {
        self.manager
            .get(&format!("/datastores/{}/versions/{}", datastore, version), "version")
            .await
    }

    /// Look a version up by its id without knowing the datastore
    pub async fn get_by_uuid(&self, version: &str) -> Result<Resource> {
        self.manager
            .get(&format!("/datastores/versions/{}", version), "version")
            .await
    }
}

/// Tenants allowed to use a private datastore version
#[derive(Debug)]
pub struct DatastoreVersionMembers {
    manager: Manager,
}

impl DatastoreVersionMembers {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            manager: Manager::new(api, &DATASTORE_VERSION_MEMBER, cache),
        }
    }

    fn url(datastore: &str, version: &str) -> String {
        format!("/mgmt/datastores/{}/versions/{}/members", datastore, version)
    }

    pub async fn add(&self, datastore: &str, version: &str, tenant: &str) -> Result<Resource> {
        self.manager
            .create(
                &Self::url(datastore, version),
                &json!({ "member": tenant }),
                "datastore_version_member",
            )
            .await
    }

    pub async fn delete(&self, datastore: &str, version: &str, member: &str) -> Result<()> {
        self.manager
            .delete(&format!("{}/{}", Self::url(datastore, version), member))
            .await
    }

    pub async fn list(
        &self,
        datastore: &str,
        version: &str,
        limit: Option<u32>,
        marker: Option<&str>,
    ) -> Result<Paginated<Resource>> {
        self.manager
            .paginated(&Self::url(datastore, version), "datastore_version_members", limit, marker)
            .await
    }

    pub async fn get(&self, datastore: &str, version: &str, member: &str) -> Result<Resource> {
        self.manager
            .get(
                &format!("{}/{}", Self::url(datastore, version), member),
                "datastore_version_member",
            )
            .await
    }

    /// Every version of `datastore` the tenant is a member of
    pub async fn get_by_tenant(
        &self,
        datastore: &str,
        tenant: &str,
        limit: Option<u32>,
        marker: Option<&str>,
    ) -> Result<Paginated<Resource>> {
        let url = format!("/mgmt/datastores/{}/versions/members/{}", datastore, tenant);
        self.manager
            .paginated(&url, "datastore_version_members", limit, marker)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeHttpClient;
    use crate::http::Method;
    use crate::v1::test_support::{api, no_cache};

    #[tokio::test]
    async fn test_datastore_and_version_urls() {
        let (api, fake) = api(
            FakeHttpClient::new()
                .on(
                    Method::GET,
                    "/datastores?limit=10&marker=m",
                    200,
                    Some(json!({"datastores": [{"id": "d1", "name": "mysql"}]})),
                )
                .on(
                    Method::GET,
                    "/datastores/d1/versions/v1",
                    200,
                    Some(json!({"version": {"id": "v1", "name": "5.6"}})),
                )
                .on(
                    Method::GET,
                    "/datastores/versions/v1",
                    200,
                    Some(json!({"version": {"id": "v1", "name": "5.6"}})),
                ),
        );
        let datastores = Datastores::new(api.clone(), no_cache());
        let versions = DatastoreVersions::new(api, no_cache());

        let page = datastores.list(Some(10), Some("m")).await.unwrap();
        assert_eq!(page[0].to_string(), "<Datastore: mysql>");

        let by_path = versions.get("d1", "v1").await.unwrap();
        let by_uuid = versions.get_by_uuid("v1").await.unwrap();
        assert_eq!(by_path, by_uuid);
        assert_eq!(fake.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_members() {
        let (api, fake) = api(
            FakeHttpClient::new()
                .on(
                    Method::POST,
                    "/mgmt/datastores/data_store1/versions/datastore_version1/members",
                    200,
                    Some(json!({"datastore_version_member": {"id": "m1", "tenant_id": "tenant1"}})),
                )
                .on(
                    Method::DELETE,
                    "/mgmt/datastores/data_store1/versions/datastore_version1/members/tenant1",
                    204,
                    None,
                )
                .on(
                    Method::GET,
                    "/mgmt/datastores/datastore1/versions/members/tenant1",
                    200,
                    Some(json!({"datastore_version_members": [{"id": "m1"}]})),
                ),
        );
        let members = DatastoreVersionMembers::new(api, no_cache());

        let member = members
            .add("data_store1", "datastore_version1", "tenant1")
            .await
            .unwrap();
        assert_eq!(fake.last_request().body, Some(json!({"member": "tenant1"})));
        assert_eq!(member.str_attr("tenant_id"), Some("tenant1"));

        members
            .delete("data_store1", "datastore_version1", "tenant1")
            .await
            .unwrap();

        let by_tenant = members
            .get_by_tenant("datastore1", "tenant1", None, None)
            .await
            .unwrap();
        assert_eq!(by_tenant.len(), 1);
    }
}
