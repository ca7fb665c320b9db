//! Identifiers for shell completion, read back from the completion cache

use tracing::debug;
use trovectl_core::CacheType;

use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;

/// Print cached IDs (or names) of `category`, one per line, deduplicated
pub fn handle_complete_ids(conn_mgr: &ConnectionManager, category: &str, names: bool) -> CliResult<()> {
    let cache_type = if names {
        CacheType::HumanId
    } else {
        CacheType::Uuid
    };
    let cache = conn_mgr.completion_cache();
    debug!("Reading {} cache of {} from {:?}", cache_type, category, cache.root());

    let mut ids = cache.read(category, cache_type);
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}
