//! Connections enabled on an organization.

use async_trait::async_trait;
use auth0_management::models::{EnabledConnection, EnabledConnectionUpdate};
use auth0_management::{fetch_all, ManagementResult, PageRequest};
use serde::{Deserialize, Serialize};

use crate::child::{ChildReference, OrganizationId};
use crate::provider::ProviderContext;
use crate::relation::Relation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationConnection {
    pub connection_id: String,
    #[serde(default)]
    pub assign_membership_on_login: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_signup_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_as_button: Option<bool>,
    /// Computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

impl OrganizationConnection {
    #[must_use]
    pub fn new(connection_id: impl Into<String>, assign_membership_on_login: bool) -> Self {
        Self {
            connection_id: connection_id.into(),
            assign_membership_on_login,
            is_signup_enabled: None,
            show_as_button: None,
            name: None,
            strategy: None,
        }
    }

    fn to_request(&self) -> EnabledConnection {
        EnabledConnection {
            connection_id: self.connection_id.clone(),
            assign_membership_on_login: self.assign_membership_on_login,
            is_signup_enabled: self.is_signup_enabled,
            show_as_button: self.show_as_button,
            connection: None,
        }
    }
}

impl From<EnabledConnection> for OrganizationConnection {
    fn from(enabled: EnabledConnection) -> Self {
        let (name, strategy) = match enabled.connection {
            Some(summary) => (Some(summary.name), Some(summary.strategy)),
            None => (None, None),
        };
        Self {
            connection_id: enabled.connection_id,
            assign_membership_on_login: enabled.assign_membership_on_login,
            is_signup_enabled: enabled.is_signup_enabled,
            show_as_button: enabled.show_as_button,
            name,
            strategy,
        }
    }
}

/// Optional flags only count when the configuration sets them.
fn flag_changed(current: Option<bool>, desired: Option<bool>) -> bool {
    desired.is_some() && desired != current
}

impl ChildReference for OrganizationConnection {
    type Key = String;
    const KEY_SEGMENTS: &'static [&'static str] = &["connection_id"];

    fn key(&self) -> String {
        self.connection_id.clone()
    }

    fn key_segments(&self) -> Vec<String> {
        vec![self.connection_id.clone()]
    }

    fn from_key_segments(segments: Vec<String>) -> Self {
        Self::new(segments.into_iter().next().unwrap_or_default(), false)
    }

    fn attributes_changed(&self, desired: &Self) -> bool {
        self.assign_membership_on_login != desired.assign_membership_on_login
            || flag_changed(self.is_signup_enabled, desired.is_signup_enabled)
            || flag_changed(self.show_as_button, desired.show_as_button)
    }
}

/// `auth0_organization_connections` / `auth0_organization_connection`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizationConnections;

#[async_trait]
impl Relation for OrganizationConnections {
    type Parent = OrganizationId;
    type Child = OrganizationConnection;

    const RESOURCE_TYPE: &'static str = "auth0_organization_connections";
    const SINGULAR_RESOURCE_TYPE: &'static str = "auth0_organization_connection";
    const CHILDREN_LABEL: &'static str = "enabled connections";

    async fn list(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationId,
    ) -> ManagementResult<Vec<OrganizationConnection>> {
        let connections = fetch_all(PageRequest::first_offset(), |page| {
            ctx.client().list_enabled_connections(parent.as_str(), page)
        })
        .await?;
        Ok(connections.into_iter().map(Into::into).collect())
    }

    async fn add(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationId,
        child: &OrganizationConnection,
    ) -> ManagementResult<()> {
        ctx.client()
            .add_enabled_connection(parent.as_str(), &child.to_request())
            .await?;
        Ok(())
    }

    async fn remove(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationId,
        child: &OrganizationConnection,
    ) -> ManagementResult<()> {
        ctx.client()
            .remove_enabled_connection(parent.as_str(), &child.connection_id)
            .await
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        parent: &OrganizationId,
        child: &OrganizationConnection,
    ) -> ManagementResult<()> {
        let update = EnabledConnectionUpdate::from(&child.to_request());
        ctx.client()
            .update_enabled_connection(parent.as_str(), &child.connection_id, &update)
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
