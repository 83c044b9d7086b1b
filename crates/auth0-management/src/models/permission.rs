//! Permissions granted to roles and users.

use serde::{Deserialize, Serialize};

/// A permission as listed under a role or user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub permission_name: String,
    pub resource_server_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_server_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Identifies a permission in add/remove requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRef {
    pub permission_name: String,
    pub resource_server_identifier: String,
}

impl From<&Permission> for PermissionRef {
    fn from(permission: &Permission) -> Self {
        Self {
            permission_name: permission.permission_name.clone(),
            resource_server_identifier: permission.resource_server_identifier.clone(),
        }
    }
}
