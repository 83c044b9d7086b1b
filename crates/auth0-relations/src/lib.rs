//! Desired-state reconciliation of Auth0 one-to-many relationships.
//!
//! A parent (organization, role, user, resource server) owns a collection
//! of children (connections, members, roles, permissions, scopes, discovery
//! domains). Each kind implements [`Relation`]; [`PluralResource`] manages
//! a parent's whole collection and [`SingularResource`] a single child
//! addressed by a composite ID.
//!
//! ```no_run
//! use auth0_management::ManagementConfig;
//! use auth0_relations::relations::{RoleRef, UserRoles};
//! use auth0_relations::{PluralResource, ProviderContext, UserId};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = ProviderContext::from_config(&ManagementConfig::from_env()?)?;
//! let roles = PluralResource::new(UserRoles);
//! let state = roles
//!     .create(&ctx, &UserId::new("auth0|42"), vec![RoleRef::new("rol_admin")])
//!     .await?;
//! # let _ = state;
//! # Ok(())
//! # }
//! ```

pub mod child;
pub mod diagnostics;
pub mod difference;
pub mod error;
pub mod guard;
pub mod locks;
pub mod logging;
pub mod provider;
pub mod reconciler;
pub mod relation;
pub mod relations;
pub mod resource_id;
pub mod singular;
pub mod state;

pub use child::{
    ChildReference, OrganizationId, OrganizationMemberId, ParentKey, ResourceServerId, RoleId,
    UserId,
};
pub use diagnostics::{Diagnostic, Severity};
pub use difference::{attribute_changes, difference, Delta};
pub use error::{ChangeKind, ChildFailure, PartialFailure, RelationError, RelationResult};
pub use guard::{guard_against_erasing, GuardEquality, GuardOutcome, GuardViolation};
pub use locks::KeyedLocks;
pub use provider::{ProviderContext, ReconcileOptions};
pub use reconciler::PluralResource;
pub use relation::Relation;
pub use resource_id::{import_resource_group_id, set_resource_group_id};
pub use singular::SingularResource;
pub use state::{PluralState, SingularState};
