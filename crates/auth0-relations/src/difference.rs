//! Set difference between the prior and desired children of a parent.

use std::collections::HashSet;
use std::hash::Hash;

use crate::child::ChildReference;

/// Items of `left` whose key does not occur in `right`, in `left` order,
/// first occurrence only.
pub fn difference_by<T, K, F>(left: &[T], right: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let right_keys: HashSet<K> = right.iter().map(&key).collect();
    let mut seen = HashSet::new();
    left.iter()
        .filter(|item| {
            let k = key(*item);
            !right_keys.contains(&k) && seen.insert(k)
        })
        .cloned()
        .collect()
}

/// Children to add and remove to turn the prior set into the desired set.
#[derive(Debug, Clone, PartialEq)]
pub struct Delta<T> {
    pub to_add: Vec<T>,
    pub to_remove: Vec<T>,
}

impl<T> Default for Delta<T> {
    fn default() -> Self {
        Self {
            to_add: Vec::new(),
            to_remove: Vec::new(),
        }
    }
}

impl<T> Delta<T> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// A delta that removes everything in `children`.
    #[must_use]
    pub fn remove_all(children: Vec<T>) -> Self {
        Self {
            to_add: Vec::new(),
            to_remove: children,
        }
    }
}

/// `to_add = desired − prior` and `to_remove = prior − desired`, by key.
///
/// Children present on both sides with different attributes are in
/// neither list; see [`attribute_changes`].
pub fn difference<T: ChildReference>(prior: &[T], desired: &[T]) -> Delta<T> {
    Delta {
        to_add: difference_by(desired, prior, T::key),
        to_remove: difference_by(prior, desired, T::key),
    }
}

/// Desired children whose key is also in `prior` but whose attributes differ.
pub fn attribute_changes<T: ChildReference>(prior: &[T], desired: &[T]) -> Vec<T> {
    desired
        .iter()
        .filter(|wanted| {
            prior
                .iter()
                .find(|current| current.key() == wanted.key())
                .is_some_and(|current| current.attributes_changed(wanted))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::organization_connections::OrganizationConnection;
    use crate::relations::RoleRef;

    fn roles(ids: &[&str]) -> Vec<RoleRef> {
        ids.iter().map(|id| RoleRef::new(*id)).collect()
    }

    #[test]
    fn test_difference_by_preserves_order_and_dedupes() {
        let left = vec![3, 1, 2, 1, 4];
        let right = vec![2];
        assert_eq!(difference_by(&left, &right, |x| *x), vec![3, 1, 4]);
    }

    #[test]
    fn test_difference_add_and_remove() {
        let delta = difference(&roles(&["a", "b"]), &roles(&["b", "c"]));
        assert_eq!(delta.to_add, roles(&["c"]));
        assert_eq!(delta.to_remove, roles(&["a"]));
    }

    #[test]
    fn test_difference_of_equal_sets_is_empty() {
        let delta = difference(&roles(&["a", "b"]), &roles(&["b", "a"]));
        assert!(delta.is_empty());
    }

    #[test]
    fn test_add_and_remove_are_disjoint() {
        let prior = roles(&["a", "b", "c", "d"]);
        let desired = roles(&["c", "d", "e", "a"]);
        let delta = difference(&prior, &desired);

        for added in &delta.to_add {
            assert!(!delta.to_remove.iter().any(|r| r.key() == added.key()));
            assert!(!prior.iter().any(|p| p.key() == added.key()));
        }
        for removed in &delta.to_remove {
            assert!(!desired.iter().any(|d| d.key() == removed.key()));
        }
        assert_eq!(delta.to_add, roles(&["e"]));
        assert_eq!(delta.to_remove, roles(&["b"]));
    }

    #[test]
    fn test_attribute_only_change_is_not_add_or_remove() {
        let prior = vec![OrganizationConnection::new("con_a", false)];
        let desired = vec![OrganizationConnection::new("con_a", true)];

        assert!(difference(&prior, &desired).is_empty());
        assert_eq!(attribute_changes(&prior, &desired), desired);
    }

    #[test]
    fn test_attribute_changes_ignores_new_children() {
        let prior = vec![OrganizationConnection::new("con_a", false)];
        let desired = vec![
            OrganizationConnection::new("con_a", false),
            OrganizationConnection::new("con_b", true),
        ];
        assert!(attribute_changes(&prior, &desired).is_empty());
    }
}
