//! Lifecycle of plural relationship resources.
//!
//! A plural resource owns the whole child collection of one parent:
//!
//! - `create` guards against erasing children it does not know about, then
//!   applies the desired set.
//! - `update` applies the difference between the state and the
//!   configuration.
//! - `delete` removes exactly the children recorded in state and never
//!   touches the parent.
//!
//! After a successful create or update the collection is read back so the
//! state holds what the API actually stores.

use tracing::{debug, info, warn};

use crate::child::ParentKey;
use crate::difference::{attribute_changes, difference, Delta};
use crate::error::{PartialFailure, RelationResult};
use crate::guard::{guard_against_erasing, GuardOutcome};
use crate::provider::ProviderContext;
use crate::relation::Relation;
use crate::state::PluralState;

/// Drives one [`Relation`] through create, read, update, delete and import.
#[derive(Debug, Clone, Default)]
pub struct PluralResource<R> {
    relation: R,
}

impl<R: Relation> PluralResource<R> {
    #[must_use]
    pub fn new(relation: R) -> Self {
        Self { relation }
    }

    #[must_use]
    pub fn relation(&self) -> &R {
        &self.relation
    }

    pub async fn create(
        &self,
        ctx: &ProviderContext,
        parent: &R::Parent,
        desired: Vec<R::Child>,
    ) -> RelationResult<PluralState<R::Child>> {
        let parent_id = parent.resource_id();
        let existing = self.relation.list(ctx, parent).await?;

        let outcome = guard_against_erasing(
            R::RESOURCE_TYPE,
            R::CHILDREN_LABEL,
            &parent_id,
            &existing,
            &desired,
            ctx.options().guard_equality,
        )?;

        if outcome == GuardOutcome::AlreadySatisfied {
            info!(
                resource_type = R::RESOURCE_TYPE,
                parent_id = %parent_id,
                count = existing.len(),
                "Desired children already present"
            );
            return Ok(PluralState::new(parent_id, existing));
        }

        info!(
            resource_type = R::RESOURCE_TYPE,
            parent_id = %parent_id,
            count = desired.len(),
            "Creating relationship"
        );
        let delta = difference(&[], &desired);
        self.apply(ctx, parent, &delta, &[]).await?;
        self.read_back(ctx, parent).await
    }

    /// Refresh the state from the API.
    ///
    /// Returns `None` when the parent no longer exists, which clears the
    /// resource from state.
    pub async fn read(
        &self,
        ctx: &ProviderContext,
        state: &PluralState<R::Child>,
    ) -> RelationResult<Option<PluralState<R::Child>>> {
        let parent = R::Parent::parse(&state.id)?;
        match self.relation.list(ctx, &parent).await {
            Ok(children) => Ok(Some(PluralState::new(state.id.clone(), children))),
            Err(err) if err.is_not_found() => {
                warn!(
                    resource_type = R::RESOURCE_TYPE,
                    parent_id = %state.id,
                    "Parent not found, removing from state"
                );
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn update(
        &self,
        ctx: &ProviderContext,
        prior: &PluralState<R::Child>,
        desired: Vec<R::Child>,
    ) -> RelationResult<PluralState<R::Child>> {
        let parent = R::Parent::parse(&prior.id)?;
        let delta = difference(&prior.children, &desired);
        let changed = attribute_changes(&prior.children, &desired);

        if delta.is_empty() && changed.is_empty() {
            debug!(
                resource_type = R::RESOURCE_TYPE,
                parent_id = %prior.id,
                "No changes"
            );
        } else {
            info!(
                resource_type = R::RESOURCE_TYPE,
                parent_id = %prior.id,
                to_add = delta.to_add.len(),
                to_remove = delta.to_remove.len(),
                changed = changed.len(),
                "Reconciling relationship"
            );
            self.apply(ctx, &parent, &delta, &changed).await?;
        }

        self.read_back(ctx, &parent).await
    }

    /// Remove every child recorded in `state`, tolerating not-found.
    pub async fn delete(
        &self,
        ctx: &ProviderContext,
        state: &PluralState<R::Child>,
    ) -> RelationResult<()> {
        let parent = R::Parent::parse(&state.id)?;
        info!(
            resource_type = R::RESOURCE_TYPE,
            parent_id = %state.id,
            count = state.children.len(),
            "Removing tracked children"
        );
        let delta = Delta::remove_all(state.children.clone());
        self.apply(ctx, &parent, &delta, &[]).await
    }

    /// Adopt the live children of the parent named by `id`.
    pub async fn import(
        &self,
        ctx: &ProviderContext,
        id: &str,
    ) -> RelationResult<PluralState<R::Child>> {
        let parent = R::Parent::parse(id)?;
        self.relation.ensure_parent(ctx, &parent).await?;
        self.read_back(ctx, &parent).await
    }

    async fn apply(
        &self,
        ctx: &ProviderContext,
        parent: &R::Parent,
        delta: &Delta<R::Child>,
        changed: &[R::Child],
    ) -> RelationResult<()> {
        if delta.is_empty() && changed.is_empty() {
            return Ok(());
        }

        let failures = self.relation.apply_delta(ctx, parent, delta, changed).await;
        if failures.is_empty() {
            Ok(())
        } else {
            Err(PartialFailure {
                parent_id: parent.resource_id(),
                failures,
            }
            .into())
        }
    }

    async fn read_back(
        &self,
        ctx: &ProviderContext,
        parent: &R::Parent,
    ) -> RelationResult<PluralState<R::Child>> {
        let children = self.relation.list(ctx, parent).await?;
        Ok(PluralState::new(parent.resource_id(), children))
    }
}
