//! One entry point holding a manager for every resource category

use std::sync::Arc;

use crate::cache::CompletionCache;
use crate::http::HttpClient;
use crate::v1::{
    Backups, ConfigurationParameters, Configurations, Databases, DatastoreVersionMembers,
    DatastoreVersions, Datastores, Flavors, Instances, Limits, Management, MgmtFlavors, Root, Users,
};

/// Client for the Trove v1.0 API
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use trovectl_core::{CompletionCache, ReqwestClient, TroveClient};
///
/// # async fn example() -> trovectl_core::Result<()> {
/// let http = ReqwestClient::builder("https://trove.example.com/v1.0/tenant")
///     .token("secret")
///     .build()?;
/// let client = TroveClient::new(Arc::new(http), CompletionCache::platform_default());
///
/// for instance in client.instances.list(None, None).await? {
///     println!("{}", instance);
/// }
/// # Ok(())
/// # }
/// ```
pub struct TroveClient {
    pub instances: Instances,
    pub databases: Databases,
    pub users: Users,
    pub root: Root,
    pub flavors: Flavors,
    pub backups: Backups,
    pub configurations: Configurations,
    pub configuration_parameters: ConfigurationParameters,
    pub datastores: Datastores,
    pub datastore_versions: DatastoreVersions,
    pub datastore_version_members: DatastoreVersionMembers,
    pub limits: Limits,
    pub management: Management,
    pub mgmt_flavors: MgmtFlavors,
    api: Arc<dyn HttpClient>,
    cache: CompletionCache,
}

impl std::fmt::Debug for TroveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TroveClient")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl TroveClient {
    pub fn new(api: Arc<dyn HttpClient>, cache: CompletionCache) -> Self {
        Self {
            instances: Instances::new(api.clone(), cache.clone()),
            databases: Databases::new(api.clone(), cache.clone()),
            users: Users::new(api.clone(), cache.clone()),
            root: Root::new(api.clone(), cache.clone()),
            flavors: Flavors::new(api.clone(), cache.clone()),
            backups: Backups::new(api.clone(), cache.clone()),
            configurations: Configurations::new(api.clone(), cache.clone()),
            configuration_parameters: ConfigurationParameters::new(api.clone(), cache.clone()),
            datastores: Datastores::new(api.clone(), cache.clone()),
            datastore_versions: DatastoreVersions::new(api.clone(), cache.clone()),
            datastore_version_members: DatastoreVersionMembers::new(api.clone(), cache.clone()),
            limits: Limits::new(api.clone(), cache.clone()),
            management: Management::new(api.clone(), cache.clone()),
            mgmt_flavors: MgmtFlavors::new(api.clone(), cache.clone()),
            api,
            cache,
        }
    }

    /// The transport, for raw requests
    pub fn api(&self) -> &Arc<dyn HttpClient> {
        &self.api
    }

    pub fn completion_cache(&self) -> &CompletionCache {
        &self.cache
    }
}
