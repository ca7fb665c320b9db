//! Profile configuration for trovectl
//!
//! Named profiles hold the endpoint and token of one Trove deployment.
//!
//! # Features
//!
//! - Multiple named profiles with a default
//! - Secure token storage using the OS keyring (optional `secure-storage` feature)
//! - Environment variable expansion in config files
//! - `TROVE_URL` / `TROVE_TOKEN` overrides
//! - Platform-specific config file locations

// Allow nested config module - this is intentional for the config subsystem
#![allow(clippy::module_inception)]

pub mod config;
pub mod credential;
pub mod error;

pub use config::{Config, ENV_TOKEN, ENV_URL, Profile, ResolvedProfile};
pub use credential::CredentialStore;
pub use error::{ConfigError, Result};
