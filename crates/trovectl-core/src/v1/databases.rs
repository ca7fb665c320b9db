//! Databases inside an instance (`/instances/{id}/databases`)

use std::sync::Arc;

use serde_json::{Value, json};

use crate::cache::CompletionCache;
use crate::error::Result;
use crate::http::HttpClient;
use crate::manager::Manager;
use crate::pagination::Paginated;
use crate::resource::{Resource, ResourceId, ResourceSpec, getid};

pub static DATABASE: ResourceSpec =
    ResourceSpec::new("database", "Database", "database", "databases").display_attr("name");

#[derive(Debug)]
pub struct Databases {
    manager: Manager,
}

impl Databases {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            manager: Manager::new(api, &DATABASE, cache),
        }
    }

    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    fn url(instance: &(impl ResourceId + ?Sized)) -> Result<String> {
        Ok(format!("/instances/{}/databases", getid(instance)?))
    }

    /// Create databases by name
    pub async fn create(&self, instance: &(impl ResourceId + ?Sized), names: &[&str]) -> Result<()> {
        let databases: Vec<Value> = names.iter().map(|name| json!({"name": name})).collect();
        self.manager
            .post(&Self::url(instance)?, &json!({ "databases": databases }))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, instance: &(impl ResourceId + ?Sized), database: &str) -> Result<()> {
        let url = format!("{}/{}", Self::url(instance)?, urlencoding::encode(database));
        self.manager.delete(&url).await
    }

    pub async fn list(
        &self,
        instance: &(impl ResourceId + ?Sized),
        limit: Option<u32>,
        marker: Option<&str>,
    ) -> Result<Paginated<Resource>> {
        self.manager
            .paginated(&Self::url(instance)?, "databases", limit, marker)
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
    async fn test_create_and_delete() {
        let (api, fake) = api(
            FakeHttpClient::new()
                .on(Method::POST, "/instances/i1/databases", 202, None)
                .on(Method::DELETE, "/instances/i1/databases/db1", 202, None),
        );
        let databases = Databases::new(api, no_cache());

        databases.create("i1", &["db1", "db2"]).await.unwrap();
        assert_eq!(
            fake.last_request().body,
            Some(json!({"databases": [{"name": "db1"}, {"name": "db2"}]}))
        );

        databases.delete("i1", "db1").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_pages() {
        let (api, _) = api(FakeHttpClient::new().on(
            Method::GET,
            "/instances/i1/databases?limit=1",
            200,
            Some(json!({
                "databases": [{"name": "db1"}],
                "links": [{"rel": "next", "href": "/instances/i1/databases?limit=1&marker=db1"}]
            })),
        ));
        let databases = Databases::new(api, no_cache());

        let page = databases.list("i1", Some(1), None).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.next.as_deref(), Some("db1"));
        assert_eq!(page[0].to_string(), "<Database: db1>");
    }
}
