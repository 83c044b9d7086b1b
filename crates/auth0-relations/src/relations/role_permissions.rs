//! Permissions granted to a role.

use async_trait::async_trait;
use auth0_management::{fetch_all, ManagementResult, PageRequest};

use crate::child::RoleId;
use crate::provider::ProviderContext;
use crate::relation::Relation;
use crate::relations::PermissionGrant;

/// `auth0_role_permissions` / `auth0_role_permission`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolePermissions;

#[async_trait]
impl Relation for RolePermissions {
    type Parent = RoleId;
    type Child = PermissionGrant;

    const RESOURCE_TYPE: &'static str = "auth0_role_permissions";
    const SINGULAR_RESOURCE_TYPE: &'static str = "auth0_role_permission";
    const CHILDREN_LABEL: &'static str = "permissions";

    async fn list(
        &self,
        ctx: &ProviderContext,
        parent: &RoleId,
    ) -> ManagementResult<Vec<PermissionGrant>> {
        let permissions = fetch_all(PageRequest::first_offset(), |page| {
            ctx.client().list_role_permissions(parent.as_str(), page)
        })
        .await?;
        Ok(permissions.into_iter().map(Into::into).collect())
    }

    async fn add(
        &self,
        ctx: &ProviderContext,
        parent: &RoleId,
        child: &PermissionGrant,
    ) -> ManagementResult<()> {
        ctx.client()
            .associate_role_permissions(parent.as_str(), &[child.to_ref()])
            .await
    }

    async fn remove(
        &self,
        ctx: &ProviderContext,
        parent: &RoleId,
        child: &PermissionGrant,
    ) -> ManagementResult<()> {
        ctx.client()
            .remove_role_permissions(parent.as_str(), &[child.to_ref()])
            .await
    }

    async fn ensure_parent(&self, ctx: &ProviderContext, parent: &RoleId) -> ManagementResult<()> {
        ctx.client().get_role(parent.as_str()).await?;
        Ok(())
    }
}
