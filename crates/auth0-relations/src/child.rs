//! Identity of parents and children in a one-to-many relationship.

use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RelationResult;
use crate::resource_id::{import_resource_group_id, set_resource_group_id};

/// A child entry of a relationship collection (an enabled connection, a
/// member, a role, a scope, ...).
///
/// Identity is a stable subset of fields returned by [`ChildReference::key`];
/// every other field is an attribute that never takes part in add/remove
/// decisions.
pub trait ChildReference:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Key: Clone + Debug + Eq + Hash + Send + Sync;

    /// Names of the key segments in composite-ID order.
    const KEY_SEGMENTS: &'static [&'static str];

    fn key(&self) -> Self::Key;

    /// Key rendered as composite-ID segments.
    fn key_segments(&self) -> Vec<String>;

    /// A child carrying only its identity, as recovered from an import ID.
    fn from_key_segments(segments: Vec<String>) -> Self;

    /// Whether `desired` asks for different attributes than `self`.
    ///
    /// Only attributes the caller actually set count; computed attributes
    /// are ignored.
    fn attributes_changed(&self, _desired: &Self) -> bool {
        false
    }

    /// Short label used in messages and diffs.
    fn label(&self) -> String {
        set_resource_group_id(&self.key_segments())
    }
}

/// ID of the parent that owns a child collection.
pub trait ParentKey: Clone + Debug + Send + Sync + 'static {
    /// Names of the ID segments, e.g. `["organization_id", "user_id"]`.
    const SEGMENTS: &'static [&'static str];

    fn from_segments(segments: Vec<String>) -> Self;

    fn segments(&self) -> Vec<String>;

    /// The resource ID stored in state and used for import.
    fn resource_id(&self) -> String {
        set_resource_group_id(&self.segments())
    }

    fn parse(id: &str) -> RelationResult<Self> {
        import_resource_group_id(id, Self::SEGMENTS).map(Self::from_segments)
    }
}

macro_rules! single_segment_parent {
    ($(#[$meta:meta])* $name:ident, $segment:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ParentKey for $name {
            const SEGMENTS: &'static [&'static str] = &[$segment];

            fn from_segments(segments: Vec<String>) -> Self {
                Self(segments.into_iter().next().unwrap_or_default())
            }

            fn segments(&self) -> Vec<String> {
                vec![self.0.clone()]
            }
        }
    };
}

single_segment_parent!(OrganizationId, "organization_id");
single_segment_parent!(
    /// Resource server ID or identifier (audience).
    ResourceServerId,
    "resource_server_identifier"
);
single_segment_parent!(RoleId, "role_id");
single_segment_parent!(UserId, "user_id");

/// A user's membership in an organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrganizationMemberId {
    pub organization_id: String,
    pub user_id: String,
}

impl OrganizationMemberId {
    #[must_use]
    pub fn new(organization_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl ParentKey for OrganizationMemberId {
    const SEGMENTS: &'static [&'static str] = &["organization_id", "user_id"];

    fn from_segments(segments: Vec<String>) -> Self {
        let mut segments = segments.into_iter();
        Self {
            organization_id: segments.next().unwrap_or_default(),
            user_id: segments.next().unwrap_or_default(),
        }
    }

    fn segments(&self) -> Vec<String> {
        vec![self.organization_id.clone(), self.user_id.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelationError;

    #[test]
    fn test_single_segment_parent_round_trip() {
        let org = OrganizationId::parse("org_1").unwrap();
        assert_eq!(org.as_str(), "org_1");
        assert_eq!(org.resource_id(), "org_1");
    }

    #[test]
    fn test_single_segment_parent_rejects_composite() {
        assert!(matches!(
            RoleId::parse("rol_1::extra"),
            Err(RelationError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_member_parent_parse() {
        let member = OrganizationMemberId::parse("org_1::u1").unwrap();
        assert_eq!(member, OrganizationMemberId::new("org_1", "u1"));
        assert_eq!(member.resource_id(), "org_1::u1");
    }
}
