//! Email domains used to route users to an organization.
//!
//! Domains are keyed by name in configuration but addressed by a
//! tenant-assigned ID in the API, so remove and update resolve the ID first
//! when the child does not carry one.

use async_trait::async_trait;
use auth0_management::models::{DiscoveryDomain, DiscoveryDomainStatus, DiscoveryDomainUpdate};
use auth0_management::{fetch_all, ManagementError, ManagementResult, PageRequest};
use serde::{Deserialize, Serialize};

use crate::child::{ChildReference, OrganizationId};
use crate::provider::ProviderContext;
use crate::relation::Relation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationDiscoveryDomain {
    pub domain: String,
    #[serde(default)]
    pub status: DiscoveryDomainStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_for_organization_discovery: Option<bool>,
    /// Computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Computed. TXT record value proving domain ownership.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_txt: Option<String>,
    /// Computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_host: Option<String>,
}

impl OrganizationDiscoveryDomain {
    #[must_use]
    pub fn new(domain: impl Into<String>, status: DiscoveryDomainStatus) -> Self {
        Self {
            domain: domain.into(),
            status,
            use_for_organization_discovery: None,
            id: None,
            verification_txt: None,
            verification_host: None,
        }
    }

    fn to_request(&self) -> DiscoveryDomain {
        DiscoveryDomain {
            id: None,
            domain: self.domain.clone(),
            status: self.status,
            use_for_organization_discovery: self.use_for_organization_discovery,
            verification_txt: None,
            verification_host: None,
        }
    }
}

impl From<DiscoveryDomain> for OrganizationDiscoveryDomain {
    fn from(domain: DiscoveryDomain) -> Self {
        Self {
            domain: domain.domain,
            status: domain.status,
            use_for_organization_discovery: domain.use_for_organization_discovery,
            id: domain.id,
            verification_txt: domain.verification_txt,
            verification_host: domain.verification_host,
        }
    }
}

impl ChildReference for OrganizationDiscoveryDomain {
    type Key = String;
    const KEY_SEGMENTS: &'static [&'static str] = &["domain"];

    fn key(&self) -> String {
        self.domain.clone()
    }

    fn key_segments(&self) -> Vec<String> {
        vec![self.domain.clone()]
    }

    fn from_key_segments(segments: Vec<String>) -> Self {
        Self::new(
            segments.into_iter().next().unwrap_or_default(),
            DiscoveryDomainStatus::default(),
        )
    }

    fn attributes_changed(&self, desired: &Self) -> bool {
        self.status != desired.status
            || (desired.use_for_organization_discovery.is_some()
                && desired.use_for_organization_discovery != self.use_for_organization_discovery)
    }
}

/// `auth0_organization_discovery_domains` / `auth0_organization_discovery_domain`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizationDiscoveryDomains;

impl OrganizationDiscoveryDomains {
    async fn domain_id(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationId,
        child: &OrganizationDiscoveryDomain,
    ) -> ManagementResult<String> {
        if let Some(id) = &child.id {
            return Ok(id.clone());
        }
        self.list(ctx, parent)
            .await?
            .into_iter()
            .find(|existing| existing.domain == child.domain)
            .and_then(|existing| existing.id)
            .ok_or_else(|| {
                ManagementError::NotFound(format!(
                    "discovery domain {} on organization {}",
                    child.domain,
                    parent.as_str()
                ))
            })
    }
}

#[async_trait]
impl Relation for OrganizationDiscoveryDomains {
    type Parent = OrganizationId;
    type Child = OrganizationDiscoveryDomain;

    const RESOURCE_TYPE: &'static str = "auth0_organization_discovery_domains";
    const SINGULAR_RESOURCE_TYPE: &'static str = "auth0_organization_discovery_domain";
    const CHILDREN_LABEL: &'static str = "discovery domains";

    async fn list(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationId,
    ) -> ManagementResult<Vec<OrganizationDiscoveryDomain>> {
        let domains = fetch_all(PageRequest::first_checkpoint(), |page| {
            ctx.client().list_discovery_domains(parent.as_str(), page)
        })
        .await?;
        Ok(domains.into_iter().map(Into::into).collect())
    }

    async fn add(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationId,
        child: &OrganizationDiscoveryDomain,
    ) -> ManagementResult<()> {
        ctx.client()
            .create_discovery_domain(parent.as_str(), &child.to_request())
            .await?;
        Ok(())
    }

    async fn remove(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationId,
        child: &OrganizationDiscoveryDomain,
    ) -> ManagementResult<()> {
        let domain_id = self.domain_id(ctx, parent, child).await?;
        ctx.client()
            .delete_discovery_domain(parent.as_str(), &domain_id)
            .await
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationId,
        child: &OrganizationDiscoveryDomain,
    ) -> ManagementResult<()> {
        let domain_id = self.domain_id(ctx, parent, child).await?;
        let update = DiscoveryDomainUpdate::from(&child.to_request());
        ctx.client()
            .update_discovery_domain(parent.as_str(), &domain_id, &update)
            .await?;
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_change_is_attribute_change() {
        let current =
            OrganizationDiscoveryDomain::new("example.com", DiscoveryDomainStatus::Pending);
        let desired =
            OrganizationDiscoveryDomain::new("example.com", DiscoveryDomainStatus::Verified);
        assert_eq!(current.key(), desired.key());
        assert!(current.attributes_changed(&desired));
    }

    #[test]
    fn test_computed_fields_are_not_attribute_changes() {
        let mut current =
            OrganizationDiscoveryDomain::new("example.com", DiscoveryDomainStatus::Pending);
        current.id = Some("dd_1".into());
        current.verification_txt = Some("auth0-domain-verification=abc".into());
        current.use_for_organization_discovery = Some(true);
        let desired =
            OrganizationDiscoveryDomain::new("example.com", DiscoveryDomainStatus::Pending);
        assert!(!current.attributes_changed(&desired));
    }
}
