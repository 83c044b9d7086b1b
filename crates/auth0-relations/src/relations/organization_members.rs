//! Members of an organization.

use async_trait::async_trait;
use auth0_management::models::OrganizationMember;
use auth0_management::{fetch_all, ManagementResult, PageRequest};
use serde::{Deserialize, Serialize};

use crate::child::{ChildReference, OrganizationId};
use crate::provider::ProviderContext;
use crate::relation::Relation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    pub user_id: String,
}

impl MemberRef {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl From<OrganizationMember> for MemberRef {
    fn from(member: OrganizationMember) -> Self {
        Self::new(member.user_id)
    }
}

impl ChildReference for MemberRef {
    type Key = String;
    const KEY_SEGMENTS: &'static [&'static str] = &["user_id"];

    fn key(&self) -> String {
        self.user_id.clone()
    }

    fn key_segments(&self) -> Vec<String> {
        vec![self.user_id.clone()]
    }

    fn from_key_segments(segments: Vec<String>) -> Self {
        Self::new(segments.into_iter().next().unwrap_or_default())
    }
}

/// `auth0_organization_members` / `auth0_organization_member`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizationMembers;

#[async_trait]
impl Relation for OrganizationMembers {
    type Parent = OrganizationId;
    type Child = MemberRef;

    const RESOURCE_TYPE: &'static str = "auth0_organization_members";
    const SINGULAR_RESOURCE_TYPE: &'static str = "auth0_organization_member";
    const CHILDREN_LABEL: &'static str = "members";

    async fn list(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationId,
    ) -> ManagementResult<Vec<MemberRef>> {
        let members = fetch_all(PageRequest::first_checkpoint(), |page| {
            ctx.client().list_members(parent.as_str(), page)
        })
        .await?;
        Ok(members.into_iter().map(Into::into).collect())
    }

    async fn add(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationId,
        child: &MemberRef,
    ) -> ManagementResult<()> {
        ctx.client()
            .add_members(parent.as_str(), &[child.user_id.clone()])
            .await
    }

    async fn remove(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationId,
        child: &MemberRef,
    ) -> ManagementResult<()> {
        ctx.client()
            .remove_members(parent.as_str(), &[child.user_id.clone()])
            .await
    }

    async fn ensure_parent(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationId,
    ) -> ManagementResult<()> {
        ctx.client().get_organization(parent.as_str()).await?;
        Ok(())
    }
}
