//! Configuration management for trovectl
//!
//! Handles configuration loading from files and environment variables.
//! Configuration is stored in TOML format with support for multiple named profiles,
//! one per Trove endpoint.

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::credential::CredentialStore;
use super::error::{ConfigError, Result};
use crate::cache::CompletionCache;

/// Environment variable overriding the profile endpoint
pub const ENV_URL: &str = "TROVE_URL";
/// Environment variable overriding the profile token
pub const ENV_TOKEN: &str = "TROVE_TOKEN";

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Profile used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Where ID completion caches are written; platform cache dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_cache_dir: Option<PathBuf>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Connection settings for one Trove endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Profile {
    /// Versioned, tenant-scoped endpoint, e.g. `https://trove:8779/v1.0/<tenant>`
    pub url: String,
    /// Auth token sent as `X-Auth-Token`. Supports the `keyring:` prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Accept invalid TLS certificates
    #[serde(default)]
    pub insecure: bool,
    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Endpoint and token after keyring and environment resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProfile {
    pub url: String,
    pub token: Option<String>,
    pub insecure: bool,
    pub timeout: Option<Duration>,
}

impl Profile {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Check if this profile has a stored token
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Resolve keyring references; `TROVE_URL`/`TROVE_TOKEN` win when
    /// `use_env` is set
    pub fn resolve(&self, use_env: bool) -> Result<ResolvedProfile> {
        let store = CredentialStore::new();
        let env = |var| if use_env { Some(var) } else { None };

        let url = store
            .get_credential(&self.url, env(ENV_URL))
            .map_err(|e| ConfigError::CredentialError(format!("Failed to resolve URL: {}", e)))?;

        let token = match &self.token {
            Some(token) => Some(store.get_credential(token, env(ENV_TOKEN)).map_err(|e| {
                ConfigError::CredentialError(format!("Failed to resolve token: {}", e))
            })?),
            None if use_env => std::env::var(ENV_TOKEN).ok(),
            None => None,
        };

        Ok(ResolvedProfile {
            url,
            token,
            insecure: self.insecure,
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

impl Config {
    /// Resolve which profile to use
    ///
    /// Resolution order:
    /// 1. The explicitly requested profile
    /// 2. `default_profile`
    /// 3. The first profile, alphabetically
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<String> {
        if let Some(profile_name) = explicit_profile {
            return Ok(profile_name.to_string());
        }

        if let Some(ref default) = self.default_profile {
            return Ok(default.clone());
        }

        if let Some((name, _)) = self.list_profiles().first() {
            return Ok((*name).clone());
        }

        Err(ConfigError::NoProfiles {
            suggestion: "Use 'trovectl profile set <name> --url <endpoint>' to create a profile, \
                or set TROVE_URL."
                .to_string(),
        })
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })
    }

    /// The completion cache location this config selects
    pub fn completion_cache(&self) -> CompletionCache {
        match &self.completion_cache_dir {
            Some(dir) => CompletionCache::at(dir),
            None => CompletionCache::platform_default(),
        }
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        // Expand environment variables in the config content
        let expanded_content = Self::expand_env_vars(&content);

        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Set or update a profile
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Remove a profile by name, clearing the default if it pointed there
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// List all profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Get the path to the configuration file
    ///
    /// On macOS, `~/.config/trovectl/config.toml` is used when it (or its
    /// directory) exists, otherwise the platform path.
    ///
    /// On Linux: ~/.config/trovectl/config.toml
    /// On Windows: %APPDATA%\openstack\trovectl\config\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_path = base_dirs
                    .home_dir()
                    .join(".config")
                    .join("trovectl")
                    .join("config.toml");

                if linux_style_path.exists()
                    || linux_style_path
                        .parent()
                        .map(|p| p.exists())
                        .unwrap_or(false)
                {
                    return Ok(linux_style_path);
                }
            }
        }

        let proj_dirs =
            ProjectDirs::from("com", "openstack", "trovectl").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand environment variables in configuration content
    ///
    /// Supports ${VAR} and ${VAR:-default} syntax. Unset variables without a
    /// default are left as-is so profiles that are not used still load.
    ///
    /// Example:
    /// ```toml
    /// token = "${TROVE_PROD_TOKEN}"
    /// url = "${TROVE_PROD_URL:-https://trove.example.com:8779/v1.0/admin}"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        let expanded =
            shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok());
        expanded.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(url: &str, token: Option<&str>) -> Profile {
        Profile {
            url: url.to_string(),
            token: token.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.set_profile("prod".to_string(), profile("https://trove/v1.0/t", Some("tok")));
        config.default_profile = Some("prod".to_string());

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_profile_defaults() {
        let config: Config = toml::from_str(
            r#"
[profiles.dev]
url = "http://localhost:8779/v1.0/admin"
"#,
        )
        .unwrap();

        let dev = config.profile("dev").unwrap();
        assert!(!dev.insecure);
        assert!(!dev.has_token());
        assert_eq!(dev.timeout_secs, None);
        assert_eq!(config.completion_cache_dir, None);
    }

    #[test]
    #[serial_test::serial]
    fn test_env_var_expansion() {
        unsafe {
            std::env::set_var("TEST_TROVE_TOKEN", "test-token-value");
            std::env::remove_var("TEST_TROVE_MISSING");
        }

        let content = r#"
[profiles.test]
url = "${TEST_TROVE_MISSING:-http://fallback:8779/v1.0/t}"
token = "${TEST_TROVE_TOKEN}"
"#;

        let expanded = Config::expand_env_vars(content);
        assert!(expanded.contains("test-token-value"));
        assert!(expanded.contains("http://fallback:8779/v1.0/t"));

        unsafe {
            std::env::remove_var("TEST_TROVE_TOKEN");
        }
    }

    #[test]
    fn test_profile_resolution_order() {
        let mut config = Config::default();
        assert!(matches!(
            config.resolve_profile(None),
            Err(ConfigError::NoProfiles { .. })
        ));

        config.set_profile("zeta".into(), profile("http://z", None));
        config.set_profile("alpha".into(), profile("http://a", None));
        assert_eq!(config.resolve_profile(None).unwrap(), "alpha");

        config.default_profile = Some("zeta".into());
        assert_eq!(config.resolve_profile(None).unwrap(), "zeta");

        assert_eq!(config.resolve_profile(Some("other")).unwrap(), "other");
    }

    #[test]
    fn test_remove_profile_clears_default() {
        let mut config = Config::default();
        config.set_profile("prod".into(), profile("http://p", None));
        config.default_profile = Some("prod".into());

        assert!(config.remove_profile("prod").is_some());
        assert_eq!(config.default_profile, None);
        assert!(config.remove_profile("prod").is_none());
    }

    #[test]
    #[serial_test::serial]
    fn test_resolve_respects_env_switch() {
        unsafe {
            std::env::set_var(ENV_URL, "http://from-env");
            std::env::set_var(ENV_TOKEN, "env-token");
        }

        let p = Profile {
            timeout_secs: Some(30),
            ..profile("http://from-file", Some("file-token"))
        };

        let with_env = p.resolve(true).unwrap();
        assert_eq!(with_env.url, "http://from-env");
        assert_eq!(with_env.token.as_deref(), Some("env-token"));
        assert_eq!(with_env.timeout, Some(Duration::from_secs(30)));

        let without_env = p.resolve(false).unwrap();
        assert_eq!(without_env.url, "http://from-file");
        assert_eq!(without_env.token.as_deref(), Some("file-token"));

        unsafe {
            std::env::remove_var(ENV_URL);
            std::env::remove_var(ENV_TOKEN);
        }
    }

    #[test]
    fn test_completion_cache_dir() {
        let config = Config {
            completion_cache_dir: Some(PathBuf::from("/tmp/trove-cache")),
            ..Default::default()
        };
        assert_eq!(
            config.completion_cache().root(),
            Some(Path::new("/tmp/trove-cache"))
        );
    }
}
