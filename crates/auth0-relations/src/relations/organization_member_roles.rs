//! Roles assigned to a member within an organization.

use async_trait::async_trait;
use auth0_management::{fetch_all, ManagementResult, PageRequest};

use crate::child::OrganizationMemberId;
use crate::provider::ProviderContext;
use crate::relation::Relation;
use crate::relations::RoleRef;

/// `auth0_organization_member_roles` / `auth0_organization_member_role`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizationMemberRoles;

#[async_trait]
impl Relation for OrganizationMemberRoles {
    type Parent = OrganizationMemberId;
    type Child = RoleRef;

    const RESOURCE_TYPE: &'static str = "auth0_organization_member_roles";
    const SINGULAR_RESOURCE_TYPE: &'static str = "auth0_organization_member_role";
    const CHILDREN_LABEL: &'static str = "roles";

    async fn list(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationMemberId,
    ) -> ManagementResult<Vec<RoleRef>> {
        let roles = fetch_all(PageRequest::first_offset(), |page| {
            ctx.client()
                .list_member_roles(&parent.organization_id, &parent.user_id, page)
        })
        .await?;
        Ok(roles.into_iter().map(Into::into).collect())
    }

    async fn add(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationMemberId,
        child: &RoleRef,
    ) -> ManagementResult<()> {
        ctx.client()
            .assign_member_roles(
                &parent.organization_id,
                &parent.user_id,
                &[child.role_id.clone()],
            )
            .await
    }

    async fn remove(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationMemberId,
        child: &RoleRef,
    ) -> ManagementResult<()> {
        ctx.client()
            .remove_member_roles(
                &parent.organization_id,
                &parent.user_id,
                &[child.role_id.clone()],
            )
            .await
    }

    async fn ensure_parent(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationMemberId,
    ) -> ManagementResult<()> {
        ctx.client()
            .get_organization(&parent.organization_id)
            .await?;
        ctx.client().get_user(&parent.user_id).await?;
        Ok(())
    }
}
