//! Permissions granted directly to a user.

use async_trait::async_trait;
use auth0_management::{fetch_all, ManagementResult, PageRequest};

use crate::child::UserId;
use crate::provider::ProviderContext;
use crate::relation::Relation;
use crate::relations::PermissionGrant;

/// `auth0_user_permissions` / `auth0_user_permission`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserPermissions;

#[async_trait]
impl Relation for UserPermissions {
    type Parent = UserId;
    type Child = PermissionGrant;

    const RESOURCE_TYPE: &'static str = "auth0_user_permissions";
    const SINGULAR_RESOURCE_TYPE: &'static str = "auth0_user_permission";
    const CHILDREN_LABEL: &'static str = "permissions";

    async fn list(
        &self,
        ctx: &ProviderContext,
        parent: &UserId,
    ) -> ManagementResult<Vec<PermissionGrant>> {
        let permissions = fetch_all(PageRequest::first_offset(), |page| {
            ctx.client().list_user_permissions(parent.as_str(), page)
        })
        .await?;
        Ok(permissions.into_iter().map(Into::into).collect())
    }

    async fn add(
        &self,
        ctx: &ProviderContext,
        parent: &UserId,
        child: &PermissionGrant,
    ) -> ManagementResult<()> {
        ctx.client()
            .assign_user_permissions(parent.as_str(), &[child.to_ref()])
            .await
    }

    async fn remove(
        &self,
        ctx: &ProviderContext,
        parent: &UserId,
        child: &PermissionGrant,
    ) -> ManagementResult<()> {
        ctx.client()
            .remove_user_permissions(parent.as_str(), &[child.to_ref()])
            .await
    }

    async fn ensure_parent(&self, ctx: &ProviderContext, parent: &UserId) -> ManagementResult<()> {
        ctx.client().get_user(parent.as_str()).await?;
        Ok(())
    }
}
