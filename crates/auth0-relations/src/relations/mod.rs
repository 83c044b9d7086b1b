//! The relationship kinds, one module each, plus child types they share.

pub mod organization_connections;
pub mod organization_discovery_domains;
pub mod organization_member_roles;
pub mod organization_members;
pub mod resource_server_scopes;
pub mod role_permissions;
pub mod user_permissions;
pub mod user_roles;

use auth0_management::models::{Permission, PermissionRef, Role};
use serde::{Deserialize, Serialize};

use crate::child::ChildReference;

pub use organization_connections::{OrganizationConnection, OrganizationConnections};
pub use organization_discovery_domains::{
    OrganizationDiscoveryDomain, OrganizationDiscoveryDomains,
};
pub use organization_member_roles::OrganizationMemberRoles;
pub use organization_members::{MemberRef, OrganizationMembers};
pub use resource_server_scopes::{ResourceServerScopes, ScopeRef};
pub use role_permissions::RolePermissions;
pub use user_permissions::UserPermissions;
pub use user_roles::UserRoles;

/// A role assigned to a user or organization member.
///
/// `name` and `description` are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub role_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RoleRef {
    #[must_use]
    pub fn new(role_id: impl Into<String>) -> Self {
        Self {
            role_id: role_id.into(),
            name: None,
            description: None,
        }
    }
}

impl From<Role> for RoleRef {
    fn from(role: Role) -> Self {
        Self {
            role_id: role.id,
            name: role.name,
            description: role.description,
        }
    }
}

impl ChildReference for RoleRef {
    type Key = String;
    const KEY_SEGMENTS: &'static [&'static str] = &["role_id"];

    fn key(&self) -> String {
        self.role_id.clone()
    }

    fn key_segments(&self) -> Vec<String> {
        vec![self.role_id.clone()]
    }

    fn from_key_segments(segments: Vec<String>) -> Self {
        Self::new(segments.into_iter().next().unwrap_or_default())
    }
}

/// A permission granted to a role or user, identified by the resource
/// server identifier and the permission (scope) name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub name: String,
    pub resource_server_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_server_name: Option<String>,
}

impl PermissionGrant {
    #[must_use]
    pub fn new(resource_server_identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_server_identifier: resource_server_identifier.into(),
            description: None,
            resource_server_name: None,
        }
    }

    #[must_use]
    pub fn to_ref(&self) -> PermissionRef {
        PermissionRef {
            permission_name: self.name.clone(),
            resource_server_identifier: self.resource_server_identifier.clone(),
        }
    }
}

impl From<Permission> for PermissionGrant {
    fn from(permission: Permission) -> Self {
        Self {
            name: permission.permission_name,
            resource_server_identifier: permission.resource_server_identifier,
            description: permission.description,
            resource_server_name: permission.resource_server_name,
        }
    }
}

impl ChildReference for PermissionGrant {
    type Key = (String, String);
    const KEY_SEGMENTS: &'static [&'static str] =
        &["resource_server_identifier", "permission_name"];

    fn key(&self) -> (String, String) {
        (self.resource_server_identifier.clone(), self.name.clone())
    }

    fn key_segments(&self) -> Vec<String> {
        vec![self.resource_server_identifier.clone(), self.name.clone()]
    }

    fn from_key_segments(segments: Vec<String>) -> Self {
        let mut segments = segments.into_iter();
        let resource_server_identifier = segments.next().unwrap_or_default();
        let name = segments.next().unwrap_or_default();
        Self::new(resource_server_identifier, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ref_identity_ignores_name() {
        let mut named = RoleRef::new("rol_1");
        named.name = Some("Admin".into());
        assert_eq!(named.key(), RoleRef::new("rol_1").key());
        assert!(!named.attributes_changed(&RoleRef::new("rol_1")));
    }

    #[test]
    fn test_permission_grant_key_segments() {
        let grant = PermissionGrant::new("https://api.example.com", "read:foo");
        assert_eq!(grant.label(), "https://api.example.com::read:foo");
        assert_eq!(PermissionGrant::from_key_segments(grant.key_segments()), grant);
        assert_eq!(grant.to_ref().permission_name, "read:foo");
    }
}
