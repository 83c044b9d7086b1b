//! Auth0 Management API client for the relationship collections of a
//! tenant: organization connections, members, member roles and discovery
//! domains, resource server scopes, and role and user permissions and roles.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod retry;

pub use client::ManagementClient;
pub use config::{ConfigError, ManagementConfig};
pub use error::{ManagementError, ManagementResult};
pub use pagination::{fetch_all, Page, PageRequest};
