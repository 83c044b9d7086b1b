//! Scopes defined on a resource server.
//!
//! The API only exposes the scope list as a field of the resource server, so
//! every change is a read-modify-write of the whole list. The write holds
//! the provider's keyed lock for the resource server so concurrent scope
//! resources on the same server do not overwrite each other.

use async_trait::async_trait;
use auth0_management::models::ResourceServerScope;
use auth0_management::ManagementResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::child::{ChildReference, ResourceServerId};
use crate::difference::Delta;
use crate::error::{ChangeKind, ChildFailure};
use crate::provider::ProviderContext;
use crate::relation::Relation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeRef {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ScopeRef {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn to_scope(&self) -> ResourceServerScope {
        ResourceServerScope {
            value: self.value.clone(),
            description: self.description.clone(),
        }
    }
}

impl From<ResourceServerScope> for ScopeRef {
    fn from(scope: ResourceServerScope) -> Self {
        Self {
            value: scope.value,
            description: scope.description,
        }
    }
}

impl ChildReference for ScopeRef {
    type Key = String;
    const KEY_SEGMENTS: &'static [&'static str] = &["scope"];

    fn key(&self) -> String {
        self.value.clone()
    }

    fn key_segments(&self) -> Vec<String> {
        vec![self.value.clone()]
    }

    fn from_key_segments(segments: Vec<String>) -> Self {
        Self::new(segments.into_iter().next().unwrap_or_default())
    }

    fn attributes_changed(&self, desired: &Self) -> bool {
        desired.description.is_some() && desired.description != self.description
    }
}

/// Append `scope` unless an entry with the same value exists. Returns
/// whether the list grew.
fn insert_missing(scopes: &mut Vec<ResourceServerScope>, scope: &ScopeRef) -> bool {
    if scopes.iter().any(|existing| existing.value == scope.value) {
        return false;
    }
    scopes.push(scope.to_scope());
    true
}

/// Insert `scope`, replacing an entry with the same value.
fn upsert(scopes: &mut Vec<ResourceServerScope>, scope: &ScopeRef) {
    match scopes.iter_mut().find(|existing| existing.value == scope.value) {
        Some(existing) => *existing = scope.to_scope(),
        None => scopes.push(scope.to_scope()),
    }
}

/// `auth0_resource_server_scopes` / `auth0_resource_server_scope`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceServerScopes;

impl ResourceServerScopes {
    /// Edit the scope list under the resource server's lock.
    ///
    /// `edit` returns whether anything changed; the PATCH is skipped when it
    /// did not.
    async fn modify<F>(
        &self,
        ctx: &ProviderContext,
        parent: &ResourceServerId,
        edit: F,
    ) -> ManagementResult<()>
    where
        F: FnOnce(&mut Vec<ResourceServerScope>) -> bool + Send,
    {
        let _guard = ctx.locks().lock(parent.as_str()).await;

        let mut scopes = ctx
            .client()
            .get_resource_server(parent.as_str())
            .await?
            .scopes;
        if !edit(&mut scopes) {
            debug!(resource_server = parent.as_str(), "Scopes unchanged");
            return Ok(());
        }

        ctx.client()
            .update_resource_server_scopes(parent.as_str(), &scopes)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Relation for ResourceServerScopes {
    type Parent = ResourceServerId;
    type Child = ScopeRef;

    const RESOURCE_TYPE: &'static str = "auth0_resource_server_scopes";
    const SINGULAR_RESOURCE_TYPE: &'static str = "auth0_resource_server_scope";
    const CHILDREN_LABEL: &'static str = "scopes";

    async fn list(
        &self,
        ctx: &ProviderContext,
        parent: &ResourceServerId,
    ) -> ManagementResult<Vec<ScopeRef>> {
        let server = ctx.client().get_resource_server(parent.as_str()).await?;
        Ok(server.scopes.into_iter().map(Into::into).collect())
    }

    async fn add(
        &self,
        ctx: &ProviderContext,
        parent: &ResourceServerId,
        child: &ScopeRef,
    ) -> ManagementResult<()> {
        self.modify(ctx, parent, |scopes| insert_missing(scopes, child))
            .await
    }

    async fn remove(
        &self,
        ctx: &ProviderContext,
        parent: &ResourceServerId,
        child: &ScopeRef,
    ) -> ManagementResult<()> {
        self.modify(ctx, parent, |scopes| {
            let before = scopes.len();
            scopes.retain(|existing| existing.value != child.value);
            scopes.len() != before
        })
        .await
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        parent: &ResourceServerId,
        child: &ScopeRef,
    ) -> ManagementResult<()> {
        self.modify(ctx, parent, |scopes| {
            upsert(scopes, child);
            true
        })
        .await
    }

    /// One read-modify-write for the whole delta.
    async fn apply_delta(
        &self,
        ctx: &ProviderContext,
        parent: &ResourceServerId,
        delta: &Delta<ScopeRef>,
        changed: &[ScopeRef],
    ) -> Vec<ChildFailure> {
        let result = self
            .modify(ctx, parent, |scopes| {
                let before = scopes.clone();
                scopes.retain(|existing| {
                    !delta
                        .to_remove
                        .iter()
                        .any(|removed| removed.value == existing.value)
                });
                for scope in changed {
                    upsert(scopes, scope);
                }
                for scope in &delta.to_add {
                    insert_missing(scopes, scope);
                }
                *scopes != before
            })
            .await;

        match result {
            Ok(()) => Vec::new(),
            Err(err) if err.is_not_found() && delta.to_add.is_empty() && changed.is_empty() => {
                warn!(
                    resource_server = parent.as_str(),
                    "Resource server not found, scopes already gone"
                );
                Vec::new()
            }
            Err(err) => {
                let kind = if delta.to_add.is_empty() && changed.is_empty() {
                    ChangeKind::Remove
                } else {
                    ChangeKind::Update
                };
                let scopes: Vec<String> = delta
                    .to_remove
                    .iter()
                    .chain(changed)
                    .chain(&delta.to_add)
                    .map(ChildReference::label)
                    .collect();
                vec![ChildFailure::new(kind, scopes.join(", "), err)]
            }
        }
    }
}
