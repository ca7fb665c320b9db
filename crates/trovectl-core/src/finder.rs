//! Resolve a user-supplied token (id, id prefix or name) to one resource

use std::fmt::Display;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::resource::{Resource, ResourceSpec};

/// What the finder and [`Resource::refresh`] need from a manager
#[async_trait]
pub trait ResourceLookup: Send + Sync {
    fn spec(&self) -> &'static ResourceSpec;

    /// Whether single resources can be fetched by id
    fn supports_get(&self) -> bool {
        true
    }

    async fn get(&self, id: &str) -> Result<Resource>;

    /// Every resource of the category, across all pages
    async fn list_all(&self) -> Result<Vec<Resource>>;

    fn supports_prefix_lookup(&self) -> bool {
        self.spec().prefix_lookup
    }
}

fn swallow_not_found(result: Result<Resource>) -> Result<Option<Resource>> {
    match result {
        Ok(resource) => Ok(Some(resource)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

fn ambiguous(type_name: &str, token: &str) -> ApiError {
    ApiError::Command(format!(
        "Multiple {} matches found for '{}', use an ID to be more specific.",
        type_name.to_lowercase(),
        token
    ))
}

/// Resolve `token` to exactly one resource.
///
/// Integer-like tokens and UUIDs are fetched directly; then a unique id
/// prefix is tried when the category supports it; finally the full listing
/// is scanned for a matching `display_name` and then `name`.
pub async fn find_resource<L>(lookup: &L, token: impl Display) -> Result<Resource>
where
    L: ResourceLookup + ?Sized,
{
    let token = token.to_string();
    let type_name = lookup.spec().type_name;

    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        if let Some(found) = swallow_not_found(lookup.get(&token).await)? {
            return Ok(found);
        }
    }

    if Uuid::parse_str(&token).is_ok() {
        if let Some(found) = swallow_not_found(lookup.get(&token).await)? {
            return Ok(found);
        }
    }

    let all = lookup.list_all().await?;

    if lookup.supports_prefix_lookup() {
        let mut matches: Vec<&Resource> = all
            .iter()
            .filter(|r| r.id().is_some_and(|id| id.starts_with(token.as_str())))
            .collect();

        match matches.len() {
            0 => {}
            1 => return Ok(matches.remove(0).clone()),
            n => {
                debug!("{} {} ids start with '{}'", n, type_name, token);
                return Err(ambiguous(type_name, &token));
            }
        }
    }

    for field in ["display_name", "name"] {
        let mut matches: Vec<&Resource> = all
            .iter()
            .filter(|r| r.str_attr(field) == Some(token.as_str()))
            .collect();

        match matches.len() {
            0 => continue,
            1 => return Ok(matches.remove(0).clone()),
            n => {
                debug!("{} {} resources have {} '{}'", n, type_name, field, token);
                return Err(ambiguous(type_name, &token));
            }
        }
    }

    Err(ApiError::Command(format!(
        "No {} with a name or ID of '{}' exists.",
        type_name.to_lowercase(),
        token
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    static THING: ResourceSpec = ResourceSpec::new("thing", "Thing", "thing", "things");
    static PREFIXED: ResourceSpec =
        ResourceSpec::new("thing", "Thing", "thing", "things").prefix_lookup();

    struct Lookup {
        spec: &'static ResourceSpec,
        items: Vec<Value>,
        gets: Mutex<Vec<String>>,
        listings: Mutex<usize>,
        fail_get: bool,
    }

    impl Lookup {
        fn new(spec: &'static ResourceSpec, items: Vec<Value>) -> Self {
            Self {
                spec,
                items,
                gets: Mutex::new(Vec::new()),
                listings: Mutex::new(0),
                fail_get: false,
            }
        }

        fn resources(&self) -> Vec<Resource> {
            self.items
                .iter()
                .map(|v| Resource::from_value(self.spec, v.clone(), false).unwrap())
                .collect()
        }
    }

    #[async_trait]
    impl ResourceLookup for Lookup {
        fn spec(&self) -> &'static ResourceSpec {
            self.spec
        }

        async fn get(&self, id: &str) -> Result<Resource> {
            self.gets.lock().unwrap().push(id.to_string());
            if self.fail_get {
                return Err(ApiError::ServerError {
                    status: 500,
                    message: "boom".into(),
                });
            }
            self.resources()
                .into_iter()
                .find(|r| r.id() == Some(id))
                .ok_or_else(|| ApiError::NotFound {
                    message: id.to_string(),
                })
        }

        async fn list_all(&self) -> Result<Vec<Resource>> {
            *self.listings.lock().unwrap() += 1;
            Ok(self.resources())
        }
    }

    fn entity_one() -> Lookup {
        Lookup::new(
            &THING,
            vec![
                json!({"id": "1234", "name": "entity_one"}),
                json!({"id": "5678", "name": "entity_two", "display_name": "Second"}),
            ],
        )
    }

    #[tokio::test]
    async fn test_integer_and_string_tokens_resolve_by_get() {
        let lookup = entity_one();
        let by_get = lookup.get("1234").await.unwrap();

        assert_eq!(find_resource(&lookup, 1234).await.unwrap(), by_get);
        assert_eq!(find_resource(&lookup, "1234").await.unwrap(), by_get);
    }

    #[tokio::test]
    async fn test_name_resolves() {
        let lookup = entity_one();
        let found = find_resource(&lookup, "entity_one").await.unwrap();
        assert_eq!(found.id(), Some("1234"));
        assert!(lookup.gets.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_display_name_wins_over_name() {
        let lookup = entity_one();
        let found = find_resource(&lookup, "Second").await.unwrap();
        assert_eq!(found.id(), Some("5678"));
    }

    #[tokio::test]
    async fn test_unknown_token_fails_with_command_error() {
        let lookup = entity_one();
        let err = find_resource(&lookup, "nonexistent").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "No thing with a name or ID of 'nonexistent' exists."
        );
    }

    #[tokio::test]
    async fn test_unknown_integer_falls_through_to_names() {
        let lookup = entity_one();
        let err = find_resource(&lookup, 99).await.unwrap_err();
        assert!(matches!(err, ApiError::Command(_)));
        assert_eq!(*lookup.gets.lock().unwrap(), vec!["99".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_names_are_ambiguous() {
        let lookup = Lookup::new(
            &THING,
            vec![
                json!({"id": "1", "name": "dup"}),
                json!({"id": "2", "name": "dup"}),
            ],
        );
        let err = find_resource(&lookup, "dup").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Multiple thing matches found for 'dup', use an ID to be more specific."
        );
    }

    #[tokio::test]
    async fn test_uuid_token_uses_get() {
        let id = "8e8ec658-c7b0-4243-bdf8-6f7f2952c0d0";
        let lookup = Lookup::new(&THING, vec![json!({"id": id, "name": "db"})]);
        let found = find_resource(&lookup, id).await.unwrap();
        assert_eq!(found.id(), Some(id));
        assert_eq!(*lookup.gets.lock().unwrap(), vec![id.to_string()]);
    }

    #[tokio::test]
    async fn test_non_not_found_errors_propagate() {
        let mut lookup = entity_one();
        lookup.fail_get = true;
        let err = find_resource(&lookup, "1234").await.unwrap_err();
        assert!(err.is_server_error());
    }

    #[tokio::test]
    async fn test_id_prefix() {
        let lookup = Lookup::new(
            &PREFIXED,
            vec![
                json!({"id": "abc-111", "name": "first"}),
                json!({"id": "abd-222", "name": "second"}),
            ],
        );

        let found = find_resource(&lookup, "abc").await.unwrap();
        assert_eq!(found.str_attr("name"), Some("first"));

        let err = find_resource(&lookup, "ab").await.unwrap_err();
        assert!(err.to_string().starts_with("Multiple thing matches"));

        // no id prefix match, name still resolves from the same listing
        *lookup.listings.lock().unwrap() = 0;
        let found = find_resource(&lookup, "second").await.unwrap();
        assert_eq!(found.id(), Some("abd-222"));
        assert_eq!(*lookup.listings.lock().unwrap(), 1);
    }
}
