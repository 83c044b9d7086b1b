//! The per-kind seam between the reconciler and the Management API.

use async_trait::async_trait;
use auth0_management::ManagementResult;
use tracing::{debug, warn};

use crate::child::{ChildReference, ParentKey};
use crate::difference::Delta;
use crate::error::{ChangeKind, ChildFailure};
use crate::provider::ProviderContext;

/// One relationship kind: how to list, add and remove children of a parent.
///
/// Implementations are stateless; everything they need comes from the
/// [`ProviderContext`].
#[async_trait]
pub trait Relation: Send + Sync + 'static {
    type Parent: ParentKey;
    type Child: ChildReference;

    /// Terraform type of the plural resource, e.g. `auth0_user_roles`.
    const RESOURCE_TYPE: &'static str;
    /// Terraform type of the one-child-per-resource variant.
    const SINGULAR_RESOURCE_TYPE: &'static str;
    /// Plural noun used in messages, e.g. `roles`.
    const CHILDREN_LABEL: &'static str;

    /// Every child of `parent`, in API order.
    async fn list(
        &self,
        ctx: &ProviderContext,
        parent: &Self::Parent,
    ) -> ManagementResult<Vec<Self::Child>>;

    async fn add(
        &self,
        ctx: &ProviderContext,
        parent: &Self::Parent,
        child: &Self::Child,
    ) -> ManagementResult<()>;

    async fn remove(
        &self,
        ctx: &ProviderContext,
        parent: &Self::Parent,
        child: &Self::Child,
    ) -> ManagementResult<()>;

    /// Apply changed attributes of an existing child.
    ///
    /// Kinds without an in-place update endpoint remove and re-add.
    async fn update(
        &self,
        ctx: &ProviderContext,
        parent: &Self::Parent,
        child: &Self::Child,
    ) -> ManagementResult<()> {
        match self.remove(ctx, parent, child).await {
            Err(err) if !err.is_not_found() => return Err(err),
            _ => {}
        }
        self.add(ctx, parent, child).await
    }

    /// Fails with `NotFound` when the parent does not exist.
    ///
    /// Used on import, where an empty listing would otherwise be mistaken
    /// for a parent without children.
    async fn ensure_parent(
        &self,
        _ctx: &ProviderContext,
        _parent: &Self::Parent,
    ) -> ManagementResult<()> {
        Ok(())
    }

    /// Apply removes, then attribute updates, then adds.
    ///
    /// Every call is attempted; failures are collected rather than
    /// returned early. Not-found on remove counts as done.
    async fn apply_delta(
        &self,
        ctx: &ProviderContext,
        parent: &Self::Parent,
        delta: &Delta<Self::Child>,
        changed: &[Self::Child],
    ) -> Vec<ChildFailure> {
        let parent_id = parent.resource_id();
        let mut failures = Vec::new();

        for child in &delta.to_remove {
            match self.remove(ctx, parent, child).await {
                Ok(()) => debug!(parent_id = %parent_id, child = %child.label(), "Removed"),
                Err(err) if err.is_not_found() => {
                    warn!(
                        parent_id = %parent_id,
                        child = %child.label(),
                        "Already removed"
                    );
                }
                Err(err) => {
                    failures.push(ChildFailure::new(ChangeKind::Remove, child.label(), err));
                }
            }
        }

        for child in changed {
            match self.update(ctx, parent, child).await {
                Ok(()) => debug!(parent_id = %parent_id, child = %child.label(), "Updated"),
                Err(err) => {
                    failures.push(ChildFailure::new(ChangeKind::Update, child.label(), err));
                }
            }
        }

        for child in &delta.to_add {
            match self.add(ctx, parent, child).await {
                Ok(()) => debug!(parent_id = %parent_id, child = %child.label(), "Added"),
                Err(err) => {
                    failures.push(ChildFailure::new(ChangeKind::Add, child.label(), err));
                }
            }
        }

        failures
    }
}
