//! Persisted state of relationship resources.

use serde::{Deserialize, Serialize};

/// State of a plural resource: the parent ID and every child it tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluralState<T> {
    /// Parent resource ID, composite for multi-segment parents.
    pub id: String,
    pub children: Vec<T>,
}

impl<T> PluralState<T> {
    #[must_use]
    pub fn new(id: impl Into<String>, children: Vec<T>) -> Self {
        Self {
            id: id.into(),
            children,
        }
    }
}

/// State of a singular resource: its composite ID and the one child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingularState<T> {
    /// Parent segments followed by the child's key segments.
    pub id: String,
    pub child: T,
}
