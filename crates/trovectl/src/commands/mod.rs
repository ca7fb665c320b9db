//! Command implementations

pub mod api;
pub mod backup;
pub mod completion;
pub mod configuration;
pub mod database;
pub mod datastore;
pub mod flavor;
pub mod instance;
pub mod limit;
pub mod mgmt;
pub mod profile;
pub mod root;
pub mod user;
pub mod utils;
