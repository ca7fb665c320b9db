//! # trovectl-core
//!
//! Client library for the Trove Database-as-a-Service API (v1.0).
//!
//! The crate is split into a small generic layer and a set of per-resource
//! managers built on top of it:
//!
//! - [`http`] - the [`HttpClient`] seam and its reqwest implementation
//! - [`error`] - HTTP status to [`ApiError`] translation
//! - [`resource`] - the dynamic [`Resource`] record and its [`ResourceSpec`]
//! - [`manager`] - list/get/create/update/delete plumbing shared by every resource
//! - [`pagination`] - marker-based [`Paginated`] lists
//! - [`finder`] - name-or-ID resolution via [`find_resource`]
//! - [`cache`] - the shell completion cache
//! - [`v1`] - instances, databases, users, backups, configurations, ...
//! - [`config`] - named connection profiles
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trovectl_core::{CompletionCache, ReqwestClient, TroveClient, find_resource};
//!
//! # async fn example() -> trovectl_core::Result<()> {
//! let http = ReqwestClient::builder("https://trove.example.com:8779/v1.0/tenant")
//!     .token("secret")
//!     .build()?;
//! let client = TroveClient::new(Arc::new(http), CompletionCache::disabled());
//!
//! let instance = find_resource(&client.instances, "db-prod").await?;
//! client.instances.restart(&instance).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod finder;
pub mod http;
pub mod manager;
pub mod pagination;
pub mod resource;
pub mod v1;

#[cfg(test)]
pub(crate) mod fake;

pub use cache::{CacheMode, CacheType, CompletionCache};
pub use client::TroveClient;
pub use error::{ApiError, Result, check_response};
pub use finder::{ResourceLookup, find_resource};
pub use http::{ApiResponse, HttpClient, Method, ReqwestClient, ReqwestClientBuilder};
pub use manager::Manager;
pub use pagination::Paginated;
pub use resource::{Resource, ResourceId, ResourceSpec, getid};
