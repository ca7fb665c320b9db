//! Resource-specific managers for the v1.0 API
//!
//! Each manager is a thin layer over [`Manager`](crate::manager::Manager):
//! a static [`ResourceSpec`](crate::resource::ResourceSpec) plus the URL
//! templates and payload shapes of its endpoints.

pub mod backups;
pub mod configurations;
pub mod databases;
pub mod datastores;
pub mod flavors;
pub mod instances;
pub mod limits;
pub mod management;
pub mod root;
pub mod users;

pub use backups::{BACKUP, Backups};
pub use configurations::{
    CONFIGURATION, CONFIGURATION_PARAMETER, ConfigurationParameters, Configurations,
    NewConfiguration,
};
pub use databases::{DATABASE, Databases};
pub use datastores::{
    DATASTORE, DATASTORE_VERSION, DATASTORE_VERSION_MEMBER, DatastoreVersionMembers,
    DatastoreVersions, Datastores,
};
pub use flavors::{FLAVOR, Flavors};
pub use instances::{INSTANCE, InstanceEdit, InstanceStatus, Instances, NewInstance};
pub use limits::{LIMIT, Limits};
pub use management::{MGMT_INSTANCE, Management, MgmtFlavors, NewFlavor, ROOT_HISTORY};
pub use root::Root;
pub use users::{NewUser, USER, UserChanges, Users};

/// Implement [`ResourceLookup`](crate::finder::ResourceLookup) by forwarding
/// to the wrapped `manager` field
macro_rules! delegate_lookup {
    ($ty:ty) => {
        #[async_trait::async_trait]
        impl $crate::finder::ResourceLookup for $ty {
            fn spec(&self) -> &'static $crate::resource::ResourceSpec {
                self.manager.spec()
            }

            fn supports_get(&self) -> bool {
                $crate::finder::ResourceLookup::supports_get(&self.manager)
            }

            async fn get(&self, id: &str) -> $crate::error::Result<$crate::resource::Resource> {
                $crate::finder::ResourceLookup::get(&self.manager, id).await
            }

            async fn list_all(
                &self,
            ) -> $crate::error::Result<Vec<$crate::resource::Resource>> {
                $crate::finder::ResourceLookup::list_all(&self.manager).await
            }
        }
    };
}

pub(crate) use delegate_lookup;

/// Shared helpers for manager unit tests
#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::cache::CompletionCache;
    use crate::fake::FakeHttpClient;
    use crate::http::HttpClient;

    pub fn api(fake: FakeHttpClient) -> (Arc<dyn HttpClient>, Arc<FakeHttpClient>) {
        let fake = Arc::new(fake);
        (fake.clone(), fake)
    }

    pub fn no_cache() -> CompletionCache {
        CompletionCache::disabled()
    }
}
