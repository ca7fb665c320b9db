//! Best-effort, on-disk ID completion cache
//!
//! Every resource category gets two plain-text files under the cache root,
//! `<category>-uuid-cache` and `<category>-human-id-cache`, holding one
//! identifier per line. Shell completion reads them back; nothing else does,
//! so every I/O failure here is logged and ignored.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, trace};

/// Which identifier a cache file collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheType {
    Uuid,
    HumanId,
}

impl CacheType {
    pub const ALL: [CacheType; 2] = [CacheType::Uuid, CacheType::HumanId];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheType::Uuid => "uuid",
            CacheType::HumanId => "human-id",
        }
    }
}

impl fmt::Display for CacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a cache file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Start over; a full listing replaces what was cached before
    Truncate,
    /// Keep existing lines; used when single resources are created
    Append,
}

/// Location of the completion cache files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionCache {
    root: Option<PathBuf>,
}

impl CompletionCache {
    /// A cache that never touches the filesystem
    pub fn disabled() -> Self {
        Self { root: None }
    }

    /// Cache files live directly under `root`
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// The platform cache directory, e.g. `~/.cache/trovectl/completion`
    pub fn platform_default() -> Self {
        match ProjectDirs::from("com", "openstack", "trovectl") {
            Some(dirs) => Self::at(dirs.cache_dir().join("completion")),
            None => {
                debug!("No home directory; completion cache disabled");
                Self::disabled()
            }
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.root.is_some()
    }

    pub fn path_for(&self, category: &str, cache_type: CacheType) -> Option<PathBuf> {
        self.root
            .as_ref()
            .map(|root| root.join(format!("{}-{}-cache", category, cache_type)))
    }

    /// Open a cache file, creating the directory on demand.
    ///
    /// Returns `None` when the cache is disabled or anything fails.
    pub fn open(
        &self,
        category: &str,
        cache_type: CacheType,
        mode: CacheMode,
    ) -> Option<CacheHandle> {
        let root = self.root.as_ref()?;
        let path = self.path_for(category, cache_type)?;

        if let Err(e) = fs::create_dir_all(root) {
            debug!("Cannot create completion cache dir {}: {}", root.display(), e);
            return None;
        }

        // Handles always append so nested scopes on one file never overwrite
        // each other's lines
        if mode == CacheMode::Truncate
            && let Err(e) = File::create(&path)
        {
            debug!("Cannot truncate completion cache {}: {}", path.display(), e);
            return None;
        }

        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                trace!("Opened completion cache {} ({:?})", path.display(), mode);
                Some(CacheHandle { file, path })
            }
            Err(e) => {
                debug!("Cannot open completion cache {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Cached identifiers for a category, empty on any failure
    pub fn read(&self, category: &str, cache_type: CacheType) -> Vec<String> {
        let Some(path) = self.path_for(category, cache_type) else {
            return Vec::new();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => contents
                .lines()
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) => {
                debug!("Cannot read completion cache {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }
}

/// An open cache file
#[derive(Debug)]
pub struct CacheHandle {
    file: File,
    path: PathBuf,
}

impl CacheHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one identifier as a line
    pub fn write_line(&mut self, value: &str) {
        if let Err(e) = writeln!(self.file, "{}", value) {
            debug!("Cannot write completion cache {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let cache = CompletionCache::at("/tmp/trove");
        assert_eq!(
            cache.path_for("instance", CacheType::HumanId),
            Some(PathBuf::from("/tmp/trove/instance-human-id-cache"))
        );
        assert_eq!(
            cache.path_for("flavor", CacheType::Uuid),
            Some(PathBuf::from("/tmp/trove/flavor-uuid-cache"))
        );
        assert_eq!(
            CompletionCache::disabled().path_for("flavor", CacheType::Uuid),
            None
        );
    }

    #[test]
    fn test_truncate_then_append() {
        let dir = TempDir::new().unwrap();
        let cache = CompletionCache::at(dir.path().join("nested"));

        let mut handle = cache
            .open("instance", CacheType::Uuid, CacheMode::Truncate)
            .unwrap();
        handle.write_line("a");
        handle.write_line("b");
        drop(handle);

        let mut handle = cache
            .open("instance", CacheType::Uuid, CacheMode::Append)
            .unwrap();
        handle.write_line("c");
        drop(handle);

        assert_eq!(cache.read("instance", CacheType::Uuid), vec!["a", "b", "c"]);

        let handle = cache.open("instance", CacheType::Uuid, CacheMode::Truncate);
        drop(handle);
        assert!(cache.read("instance", CacheType::Uuid).is_empty());
    }

    #[test]
    fn test_failures_are_swallowed() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();

        let cache = CompletionCache::at(&blocker);
        assert!(
            cache
                .open("instance", CacheType::Uuid, CacheMode::Append)
                .is_none()
        );
        assert!(cache.read("instance", CacheType::Uuid).is_empty());

        assert!(
            CompletionCache::disabled()
                .open("instance", CacheType::Uuid, CacheMode::Append)
                .is_none()
        );
    }
}
