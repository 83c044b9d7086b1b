//! Composite IDs for resources addressed by more than one parent,
//! e.g. `org_123::auth0|456`.

use crate::error::{RelationError, RelationResult};

pub const SEPARATOR: &str = "::";

/// Join ID segments into a composite resource ID.
pub fn set_resource_group_id<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Split a composite resource ID into exactly `names.len()` non-empty
/// segments.
///
/// The error names the expected segment order, e.g.
/// `organization_id::user_id`.
pub fn import_resource_group_id(id: &str, names: &[&str]) -> RelationResult<Vec<String>> {
    let segments: Vec<String> = id.split(SEPARATOR).map(str::to_string).collect();
    if segments.len() != names.len() || segments.iter().any(String::is_empty) {
        return Err(RelationError::InvalidId {
            id: id.to_string(),
            expected: names.join(SEPARATOR),
        });
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_resource_group_id() {
        assert_eq!(set_resource_group_id(&["org_1", "con_1"]), "org_1::con_1");
        assert_eq!(
            set_resource_group_id(&["rol_1".to_string(), "https://api".into(), "read:foo".into()]),
            "rol_1::https://api::read:foo"
        );
    }

    #[test]
    fn test_import_resource_group_id() {
        let segments =
            import_resource_group_id("org_1::auth0|42", &["organization_id", "user_id"]).unwrap();
        assert_eq!(segments, vec!["org_1", "auth0|42"]);
    }

    #[test]
    fn test_import_rejects_wrong_segment_count() {
        let err = import_resource_group_id("org_1", &["organization_id", "user_id"]).unwrap_err();
        match err {
            RelationError::InvalidId { id, expected } => {
                assert_eq!(id, "org_1");
                assert_eq!(expected, "organization_id::user_id");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(import_resource_group_id("a::b::c", &["organization_id", "user_id"]).is_err());
    }

    #[test]
    fn test_import_rejects_empty_segment() {
        assert!(import_resource_group_id("org_1::", &["organization_id", "user_id"]).is_err());
        assert!(import_resource_group_id("::u1", &["organization_id", "user_id"]).is_err());
    }
}
