//! Roles assigned to a user.

use async_trait::async_trait;
use auth0_management::{fetch_all, ManagementResult, PageRequest};

use crate::child::UserId;
use crate::provider::ProviderContext;
use crate::relation::Relation;
use crate::relations::RoleRef;

/// `auth0_user_roles` / `auth0_user_role`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserRoles;

#[async_trait]
impl Relation for UserRoles {
    type Parent = UserId;
    type Child = RoleRef;

    const RESOURCE_TYPE: &'static str = "auth0_user_roles";
    const SINGULAR_RESOURCE_TYPE: &'static str = "auth0_user_role";
    const CHILDREN_LABEL: &'static str = "roles";

    async fn list(&self, ctx: &ProviderContext, parent: &UserId) -> ManagementResult<Vec<RoleRef>> {
        let roles = fetch_all(PageRequest::first_offset(), |page| {
            ctx.client().list_user_roles(parent.as_str(), page)
        })
        .await?;
        Ok(roles.into_iter().map(Into::into).collect())
    }

    async fn add(
        &self,
        ctx: &ProviderContext,
        parent: &UserId,
        child: &RoleRef,
    ) -> ManagementResult<()> {
        ctx.client()
            .assign_user_roles(parent.as_str(), &[child.role_id.clone()])
            .await
    }

    async fn remove(
        &self,
        ctx: &ProviderContext,
        parent: &UserId,
        child: &RoleRef,
    ) -> ManagementResult<()> {
        ctx.client()
            .remove_user_roles(parent.as_str(), &[child.role_id.clone()])
            .await
    }

    async fn ensure_parent(&self, ctx: &ProviderContext, parent: &UserId) -> ManagementResult<()> {
        ctx.client().get_user(parent.as_str()).await?;
        Ok(())
    }
}
