//! Lifecycle of singular relationship resources.
//!
//! A singular resource manages one child of a parent, addressed by a
//! composite ID made of the parent segments followed by the child's key
//! segments, e.g. `org_1::con_1` or `rol_1::https://api::read:foo`.
//! Unlike plural resources it never guards: other children of the same
//! parent are left alone.

use tracing::{info, warn};

use crate::child::{ChildReference, ParentKey};
use crate::error::{RelationError, RelationResult};
use crate::provider::ProviderContext;
use crate::relation::Relation;
use crate::resource_id::{import_resource_group_id, set_resource_group_id};
use crate::state::SingularState;

#[derive(Debug, Clone, Default)]
pub struct SingularResource<R> {
    relation: R,
}

impl<R: Relation> SingularResource<R> {
    #[must_use]
    pub fn new(relation: R) -> Self {
        Self { relation }
    }

    /// Composite ID for `child` under `parent`.
    #[must_use]
    pub fn resource_id(parent: &R::Parent, child: &R::Child) -> String {
        let mut segments = parent.segments();
        segments.extend(child.key_segments());
        set_resource_group_id(&segments)
    }

    /// Split a composite ID into the parent and a key-only child.
    pub fn parse_id(id: &str) -> RelationResult<(R::Parent, R::Child)> {
        let names: Vec<&str> = R::Parent::SEGMENTS
            .iter()
            .chain(R::Child::KEY_SEGMENTS)
            .copied()
            .collect();
        let mut segments = import_resource_group_id(id, &names)?;
        let child_segments = segments.split_off(R::Parent::SEGMENTS.len());
        Ok((
            R::Parent::from_segments(segments),
            R::Child::from_key_segments(child_segments),
        ))
    }

    pub async fn create(
        &self,
        ctx: &ProviderContext,
        parent: &R::Parent,
        child: R::Child,
    ) -> RelationResult<SingularState<R::Child>> {
        let id = Self::resource_id(parent, &child);
        info!(resource_type = R::SINGULAR_RESOURCE_TYPE, id = %id, "Creating");
        self.relation.add(ctx, parent, &child).await?;
        self.find(ctx, parent, &child)
            .await?
            .ok_or_else(|| Self::not_found(&id))
    }

    /// Returns `None` when the child or its parent is gone.
    pub async fn read(
        &self,
        ctx: &ProviderContext,
        state: &SingularState<R::Child>,
    ) -> RelationResult<Option<SingularState<R::Child>>> {
        let (parent, child) = Self::parse_id(&state.id)?;
        match self.find(ctx, &parent, &child).await {
            Ok(None) => {
                warn!(
                    resource_type = R::SINGULAR_RESOURCE_TYPE,
                    id = %state.id,
                    "Not found, removing from state"
                );
                Ok(None)
            }
            Err(RelationError::Management(err)) if err.is_not_found() => {
                warn!(
                    resource_type = R::SINGULAR_RESOURCE_TYPE,
                    id = %state.id,
                    "Parent not found, removing from state"
                );
                Ok(None)
            }
            other => other,
        }
    }

    /// Apply `desired` to the child in `state`.
    ///
    /// A changed key replaces the child: the old one is removed and the new
    /// one added.
    pub async fn update(
        &self,
        ctx: &ProviderContext,
        state: &SingularState<R::Child>,
        desired: R::Child,
    ) -> RelationResult<SingularState<R::Child>> {
        let (parent, current) = Self::parse_id(&state.id)?;

        if current.key() != desired.key() {
            self.delete(ctx, state).await?;
            return self.create(ctx, &parent, desired).await;
        }

        if state.child.attributes_changed(&desired) {
            info!(resource_type = R::SINGULAR_RESOURCE_TYPE, id = %state.id, "Updating");
            self.relation.update(ctx, &parent, &desired).await?;
        }

        self.find(ctx, &parent, &desired)
            .await?
            .ok_or_else(|| Self::not_found(&state.id))
    }

    pub async fn delete(
        &self,
        ctx: &ProviderContext,
        state: &SingularState<R::Child>,
    ) -> RelationResult<()> {
        let (parent, _) = Self::parse_id(&state.id)?;
        info!(resource_type = R::SINGULAR_RESOURCE_TYPE, id = %state.id, "Deleting");
        match self.relation.remove(ctx, &parent, &state.child).await {
            Err(err) if err.is_not_found() => {
                warn!(
                    resource_type = R::SINGULAR_RESOURCE_TYPE,
                    id = %state.id,
                    "Already removed"
                );
                Ok(())
            }
            other => Ok(other?),
        }
    }

    pub async fn import(
        &self,
        ctx: &ProviderContext,
        id: &str,
    ) -> RelationResult<SingularState<R::Child>> {
        let (parent, child) = Self::parse_id(id)?;
        self.find(ctx, &parent, &child)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn find(
        &self,
        ctx: &ProviderContext,
        parent: &R::Parent,
        wanted: &R::Child,
    ) -> RelationResult<Option<SingularState<R::Child>>> {
        let key = wanted.key();
        let found = self
            .relation
            .list(ctx, parent)
            .await?
            .into_iter()
            .find(|child| child.key() == key);

        Ok(found.map(|child| SingularState {
            id: Self::resource_id(parent, &child),
            child,
        }))
    }

    fn not_found(id: &str) -> RelationError {
        RelationError::ChildNotFound {
            resource_type: R::SINGULAR_RESOURCE_TYPE,
            id: id.to_string(),
        }
    }
}
