//! VolunHub community platform core
//!
//! Core services of a volunteer-events platform: accounts, events with
//! capacity-controlled registration, threaded comments, friendships and
//! abuse reports. This library carries the authorization predicates and
//! per-entity lifecycle guards; transports (HTTP or otherwise) sit on top
//! and only translate requests into service calls.

#![allow(non_snake_case)]

pub mod auth;
pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ErrorKind, Result, VolunHubError};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
