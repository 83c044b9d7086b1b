//! Request and response bodies of the Management API endpoints in use.

pub mod organization;
pub mod permission;
pub mod resource_server;
pub mod role;
pub mod user;

pub use organization::{
    ConnectionSummary, DiscoveryDomain, DiscoveryDomainStatus, DiscoveryDomainUpdate,
    EnabledConnection, EnabledConnectionUpdate, Organization, OrganizationMember,
};
pub use permission::{Permission, PermissionRef};
pub use resource_server::{ResourceServer, ResourceServerScope};
pub use role::Role;
pub use user::User;
