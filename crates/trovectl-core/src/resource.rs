//! Server-returned resources
//!
//! A [`Resource`] wraps the property map of one item from a response body.
//! Which category it belongs to (and how that category is addressed on the
//! wire) is described by a static [`ResourceSpec`].

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};
use crate::finder::ResourceLookup;

/// Minimum id length treated as UUID-shaped
pub const UUID_LENGTH: usize = 36;

/// Per-category configuration consumed by the generic manager
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Lower-case category name, used for completion cache file names
    pub category: &'static str,
    /// Display name, e.g. `Instance`
    pub type_name: &'static str,
    /// Envelope key of single-item responses and request bodies
    pub singular: &'static str,
    /// Envelope key of list responses
    pub plural: &'static str,
    /// Top-level collection path, when the category has one
    pub collection: Option<&'static str>,
    /// Whether `name` doubles as a human-readable id
    pub human_id: bool,
    /// Whether short id prefixes resolve through the finder
    pub prefix_lookup: bool,
    /// Property shown in the short display form `<Type: value>`
    pub display_attr: Option<&'static str>,
}

impl ResourceSpec {
    /// A spec with the given names and every option off
    pub const fn new(
        category: &'static str,
        type_name: &'static str,
        singular: &'static str,
        plural: &'static str,
    ) -> Self {
        Self {
            category,
            type_name,
            singular,
            plural,
            collection: None,
            human_id: false,
            prefix_lookup: false,
            display_attr: None,
        }
    }

    pub const fn collection(mut self, path: &'static str) -> Self {
        self.collection = Some(path);
        self
    }

    pub const fn human_id(mut self) -> Self {
        self.human_id = true;
        self
    }

    pub const fn prefix_lookup(mut self) -> Self {
        self.prefix_lookup = true;
        self
    }

    pub const fn display_attr(mut self, attr: &'static str) -> Self {
        self.display_attr = Some(attr);
        self
    }
}

/// One server-side entity
#[derive(Debug, Clone)]
pub struct Resource {
    spec: &'static ResourceSpec,
    id: Option<String>,
    info: Map<String, Value>,
    loaded: bool,
}

impl Resource {
    /// Wrap a property map. Does not touch the completion cache; managers
    /// construct resources through `Manager::resource` for that.
    pub fn new(spec: &'static ResourceSpec, info: Map<String, Value>, loaded: bool) -> Self {
        let id = derive_id(&info);
        Self {
            spec,
            id,
            info,
            loaded,
        }
    }

    /// Wrap a JSON value that must be an object
    pub fn from_value(spec: &'static ResourceSpec, value: Value, loaded: bool) -> Result<Self> {
        match value {
            Value::Object(info) => Ok(Self::new(spec, info, loaded)),
            other => Err(ApiError::UnexpectedResponse {
                url: spec.collection.unwrap_or(spec.plural).to_string(),
                message: format!("expected a {} object, got {}", spec.singular, other),
            }),
        }
    }

    pub fn spec(&self) -> &'static ResourceSpec {
        self.spec
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// `name` when the category opts in and the id is UUID-shaped
    pub fn human_id(&self) -> Option<&str> {
        if !self.spec.human_id {
            return None;
        }
        if self.id.as_ref().is_none_or(|id| id.len() < UUID_LENGTH) {
            return None;
        }
        self.info.get("name").and_then(Value::as_str)
    }

    pub fn info(&self) -> &Map<String, Value> {
        &self.info
    }

    pub fn into_info(self) -> Map<String, Value> {
        self.info
    }

    /// Read a property without touching the network
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.info.get(name)
    }

    pub fn str_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(Value::as_str)
    }

    /// Update a property in place
    pub fn set_attr(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let id_changed = name == "id";
        self.info.insert(name, value);
        if id_changed {
            self.id = derive_id(&self.info);
        }
    }

    /// Read a property, refreshing once from the server when this resource
    /// is only a partial snapshot
    pub async fn fetch_attr(
        &mut self,
        lookup: &(dyn ResourceLookup + '_),
        name: &str,
    ) -> Result<&Value> {
        if !self.info.contains_key(name) && !self.loaded {
            self.refresh(lookup).await?;
        }

        self.info
            .get(name)
            .ok_or_else(|| ApiError::NoSuchAttribute(format!("{}.{}", self.spec.type_name, name)))
    }

    /// Re-fetch the canonical representation and merge it in
    pub async fn refresh(&mut self, lookup: &(dyn ResourceLookup + '_)) -> Result<()> {
        self.loaded = true;
        if !lookup.supports_get() {
            return Ok(());
        }
        let Some(id) = self.id.clone() else {
            return Ok(());
        };

        let fresh = lookup.get(&id).await?;
        self.add_details(fresh.into_info());
        Ok(())
    }

    /// Merge additional properties over the current ones
    pub fn add_details(&mut self, details: Map<String, Value>) {
        for (key, value) in details {
            self.info.insert(key, value);
        }
        self.id = derive_id(&self.info);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }
}

fn derive_id(info: &Map<String, Value>) -> Option<String> {
    match info.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.spec.type_name == other.spec.type_name
            && self.info == other.info
            && self.id == other.id
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(value) = self.spec.display_attr.and_then(|attr| self.info.get(attr)) {
            return write!(f, "<{}: {}>", self.spec.type_name, display_value(value));
        }

        let mut keys: Vec<&String> = self.info.keys().collect();
        keys.sort();
        let fields: Vec<String> = keys
            .into_iter()
            .map(|key| format!("{}={}", key, display_value(&self.info[key.as_str()])))
            .collect();
        write!(f, "<{} {}>", self.spec.type_name, fields.join(", "))
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.info.serialize(serializer)
    }
}

/// Anything that can name a resource by id
pub trait ResourceId {
    fn resource_id(&self) -> String;
}

impl ResourceId for str {
    fn resource_id(&self) -> String {
        self.to_string()
    }
}

impl ResourceId for String {
    fn resource_id(&self) -> String {
        self.clone()
    }
}

impl ResourceId for Resource {
    fn resource_id(&self) -> String {
        self.id.clone().unwrap_or_default()
    }
}

macro_rules! impl_resource_id_for_int {
    ($($t:ty),*) => {
        $(impl ResourceId for $t {
            fn resource_id(&self) -> String {
                self.to_string()
            }
        })*
    };
}

impl_resource_id_for_int!(u32, u64, i32, i64, usize);

impl<T: ResourceId + ?Sized> ResourceId for &T {
    fn resource_id(&self) -> String {
        (**self).resource_id()
    }
}

/// Id of a resource, or the value itself when it already is one.
///
/// Fails for an empty id, which would otherwise address the collection.
pub fn getid(obj: &(impl ResourceId + ?Sized)) -> Result<String> {
    let id = obj.resource_id();
    if id.is_empty() {
        return Err(ApiError::Command(
            "Cannot address a resource without an id".to_string(),
        ));
    }
    Ok(id)
}
