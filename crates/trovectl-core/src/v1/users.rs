//! Database users of an instance (`/instances/{id}/users`)

use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::cache::CompletionCache;
use crate::error::Result;
use crate::http::HttpClient;
use crate::manager::Manager;
use crate::pagination::{Paginated, quote_user_host};
use crate::resource::{Resource, ResourceId, ResourceSpec, getid};
use crate::v1::databases::DATABASE;

pub static USER: ResourceSpec = ResourceSpec::new("user", "User", "user", "users").display_attr("name");

/// A user to create, with the databases it may access
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub password: String,
    pub host: Option<String>,
    pub databases: Vec<String>,
}

impl NewUser {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn to_value(&self) -> Value {
        let mut user = Map::new();
        user.insert("name".into(), json!(self.name));
        user.insert("password".into(), json!(self.password));
        if let Some(host) = &self.host {
            user.insert("host".into(), json!(host));
        }
        let databases: Vec<Value> = self.databases.iter().map(|db| json!({"name": db})).collect();
        user.insert("databases".into(), Value::Array(databases));
        Value::Object(user)
    }
}

/// New values for [`Users::update_attributes`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
}

impl UserChanges {
    fn to_body(&self) -> Value {
        let mut user = Map::new();
        if let Some(name) = &self.name {
            user.insert("name".into(), json!(name));
        }
        if let Some(password) = &self.password {
            user.insert("password".into(), json!(password));
        }
        if let Some(host) = &self.host {
            user.insert("host".into(), json!(host));
        }
        json!({ "user": user })
    }
}

fn database_list(names: &[&str]) -> Value {
    let databases: Vec<Value> = names.iter().map(|name| json!({"name": name})).collect();
    json!({ "databases": databases })
}

/// Manage users of an instance
#[derive(Debug)]
pub struct Users {
    manager: Manager,
}

impl Users {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            manager: Manager::new(api, &USER, cache),
        }
    }

    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    fn url(instance: &(impl ResourceId + ?Sized)) -> Result<String> {
        Ok(format!("/instances/{}/users", getid(instance)?))
    }

    fn user_url(instance: &(impl ResourceId + ?Sized), user: &str, host: Option<&str>) -> Result<String> {
        Ok(format!("{}/{}", Self::url(instance)?, quote_user_host(user, host)))
    }

    pub async fn create(&self, instance: &(impl ResourceId + ?Sized), users: &[NewUser]) -> Result<()> {
        let users: Vec<Value> = users.iter().map(NewUser::to_value).collect();
        self.manager
            .post(&Self::url(instance)?, &json!({ "users": users }))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, instance: &(impl ResourceId + ?Sized), user: &str, host: Option<&str>) -> Result<()> {
        self.manager.delete(&Self::user_url(instance, user, host)?).await
    }

    pub async fn list(
        &self,
        instance: &(impl ResourceId + ?Sized),
        limit: Option<u32>,
        marker: Option<&str>,
    ) -> Result<Paginated<Resource>> {
        self.manager
            .paginated(&Self::url(instance)?, "users", limit, marker)
            .await
    }

    pub async fn get(&self, instance: &(impl ResourceId + ?Sized), user: &str, host: Option<&str>) -> Result<Resource> {
        self.manager
            .get(&Self::user_url(instance, user, host)?, "user")
            .await
    }

    /// Rename a user or change its password or host
    pub async fn update_attributes(
        &self,
        instance: &(impl ResourceId + ?Sized),
        user: &str,
        host: Option<&str>,
        changes: &UserChanges,
    ) -> Result<()> {
        self.manager
            .update(&Self::user_url(instance, user, host)?, &changes.to_body(), None)
            .await?;
        Ok(())
    }

    /// Databases the user can access
    pub async fn list_access(
        &self,
        instance: &(impl ResourceId + ?Sized),
        user: &str,
        host: Option<&str>,
    ) -> Result<Vec<Resource>> {
        let url = format!("{}/databases", Self::user_url(instance, user, host)?);
        self.manager
            .list_with(&url, "databases", None, |item| {
                Resource::from_value(&DATABASE, item, false)
            })
            .await
    }

    pub async fn grant(
        &self,
        instance: &(impl ResourceId + ?Sized),
        user: &str,
        databases: &[&str],
        host: Option<&str>,
    ) -> Result<()> {
        let url = format!("{}/databases", Self::user_url(instance, user, host)?);
        self.manager.update(&url, &database_list(databases), None).await?;
        Ok(())
    }

    pub async fn revoke(
        &self,
        instance: &(impl ResourceId + ?Sized),
        user: &str,
        database: &str,
        host: Option<&str>,
    ) -> Result<()> {
        let url = format!(
            "{}/databases/{}",
            Self::user_url(instance, user, host)?,
            urlencoding::encode(database)
        );
        self.manager.delete(&url).await
    }

    /// Set new passwords for several users at once
    pub async fn change_passwords(&self, instance: &(impl ResourceId + ?Sized), users: &[NewUser]) -> Result<()> {
        let users: Vec<Value> = users
            .iter()
            .map(|user| {
                let mut entry = Map::new();
                entry.insert("name".into(), json!(user.name));
                entry.insert("password".into(), json!(user.password));
                if let Some(host) = &user.host {
                    entry.insert("host".into(), json!(host));
                }
                Value::Object(entry)
            })
            .collect();
        self.manager
            .update(&Self::url(instance)?, &json!({ "users": users }), None)
            .await?;
        Ok(())
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
    async fn test_create_posts_users_with_databases() {
        let (api, fake) = api(FakeHttpClient::new().on(Method::POST, "/instances/i1/users", 202, None));
        let users = Users::new(api, no_cache());

        let user = NewUser {
            host: Some("%".into()),
            databases: vec!["db1".into()],
            ..NewUser::new("bob", "secret")
        };
        users.create("i1", &[user]).await.unwrap();

        assert_eq!(
            fake.last_request().body,
            Some(json!({"users": [{
                "name": "bob",
                "password": "secret",
                "host": "%",
                "databases": [{"name": "db1"}]
            }]}))
        );
    }

    #[tokio::test]
    async fn test_user_urls_quote_user_and_host() {
        let (api, fake) = api(
            FakeHttpClient::new()
                .on(Method::DELETE, "/instances/i1/users/bob%4010%2e0%2e0%2e1", 202, None)
                .on(
                    Method::GET,
                    "/instances/i1/users/bob",
                    200,
                    Some(json!({"user": {"name": "bob", "host": "%"}})),
                ),
        );
        let users = Users::new(api, no_cache());

        users.delete("i1", "bob", Some("10.0.0.1")).await.unwrap();
        let user = users.get("i1", "bob", None).await.unwrap();

        assert_eq!(user.to_string(), "<User: bob>");
        assert_eq!(fake.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_access_grant_and_revoke() {
        let (api, fake) = api(
            FakeHttpClient::new()
                .on(
                    Method::GET,
                    "/instances/i1/users/bob/databases",
                    200,
                    Some(json!({"databases": [{"name": "db1"}, {"name": "db2"}]})),
                )
                .on(Method::PUT, "/instances/i1/users/bob/databases", 202, None)
                .on(Method::DELETE, "/instances/i1/users/bob/databases/db1", 202, None),
        );
        let users = Users::new(api, no_cache());

        let access = users.list_access("i1", "bob", None).await.unwrap();
        assert_eq!(access.len(), 2);
        assert_eq!(access[0].spec().type_name, "Database");

        users.grant("i1", "bob", &["db3"], None).await.unwrap();
        assert_eq!(
            fake.last_request().body,
            Some(json!({"databases": [{"name": "db3"}]}))
        );

        users.revoke("i1", "bob", "db1", None).await.unwrap();
        assert_eq!(fake.last_request().method, Method::DELETE);
    }

    #[tokio::test]
    async fn test_update_attributes_and_change_passwords() {
        let (api, fake) = api(
            FakeHttpClient::new()
                .on(Method::PUT, "/instances/i1/users/bob", 202, None)
                .on(Method::PUT, "/instances/i1/users", 202, None),
        );
        let users = Users::new(api, no_cache());

        let changes = UserChanges {
            password: Some("new".into()),
            ..Default::default()
        };
        users.update_attributes("i1", "bob", None, &changes).await.unwrap();
        assert_eq!(fake.last_request().body, Some(json!({"user": {"password": "new"}})));

        users
            .change_passwords("i1", &[NewUser::new("bob", "pw2")])
            .await
            .unwrap();
        assert_eq!(
            fake.last_request().body,
            Some(json!({"users": [{"name": "bob", "password": "pw2"}]}))
        );
    }
}
