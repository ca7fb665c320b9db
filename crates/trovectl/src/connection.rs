//! Connection management: turns a profile into a ready [`TroveClient`]

use crate::error::{Result as CliResult, TroveCtlError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};
use trovectl_core::config::{Config, ENV_TOKEN, ENV_URL, ResolvedProfile};
use trovectl_core::{CompletionCache, ReqwestClient, TroveClient};

/// Connection manager for creating authenticated clients
#[derive(Clone, Debug)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl ConnectionManager {
    /// Create a new connection manager with a custom config path
    pub fn with_config_path(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Save `config` where this manager's configuration was loaded from
    pub fn save_config(&self, config: &Config) -> CliResult<PathBuf> {
        match &self.config_path {
            Some(path) => config.save_to_path(path)?,
            None => config.save()?,
        }
        let path = self.effective_config_path()?;
        debug!("Configuration saved to {}", path.display());
        Ok(path)
    }

    /// Path of the file `save_config` writes to
    pub fn effective_config_path(&self) -> CliResult<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_path()?),
        }
    }

    /// Where the completion cache lives for this configuration
    pub fn completion_cache(&self) -> CompletionCache {
        self.config.completion_cache()
    }

    /// Endpoint and token for `profile_name`, or from the environment
    ///
    /// When --config-file is explicitly specified, environment variables are
    /// ignored so an isolated config stays isolated.
    pub fn resolve(&self, profile_name: Option<&str>) -> CliResult<ResolvedProfile> {
        let use_env_vars = self.config_path.is_none();
        debug!(
            "Config path: {:?}, use_env_vars: {}",
            self.config_path, use_env_vars
        );

        if use_env_vars
            && profile_name.is_none()
            && let Ok(url) = std::env::var(ENV_URL)
        {
            info!("Using Trove endpoint from {}", ENV_URL);
            return Ok(ResolvedProfile {
                url,
                token: std::env::var(ENV_TOKEN).ok(),
                insecure: false,
                timeout: None,
            });
        }

        let name = self.config.resolve_profile(profile_name)?;
        info!("Using Trove profile: {}", name);
        let profile = self.config.profile(&name)?;
        Ok(profile.resolve(use_env_vars)?)
    }

    /// Build a client for the selected profile
    pub fn create_client(&self, profile_name: Option<&str>) -> CliResult<TroveClient> {
        let resolved = self.resolve(profile_name)?;
        if resolved.url.is_empty() {
            return Err(TroveCtlError::Configuration(
                "profile has an empty endpoint URL".to_string(),
            ));
        }

        info!("Connecting to Trove: {}", resolved.url);
        debug!(
            "Token: {}",
            if resolved.token.is_some() {
                "configured"
            } else {
                "not set"
            }
        );
        trace!("Insecure mode: {}", resolved.insecure);

        let mut builder = ReqwestClient::builder(&resolved.url)
            .insecure(resolved.insecure)
            .timeout(resolved.timeout.unwrap_or(Duration::from_secs(60)));
        if let Some(token) = &resolved.token {
            builder = builder.token(token);
        }
        let http = builder.build()?;

        debug!("Trove client created successfully");
        Ok(TroveClient::new(Arc::new(http), self.completion_cache()))
    }
}
