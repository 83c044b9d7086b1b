//! Reconciliation error types.

use std::fmt;

use auth0_management::{ConfigError, ManagementError};
use thiserror::Error;

use crate::diagnostics::Diagnostic;
use crate::guard::GuardViolation;

pub type RelationResult<T> = Result<T, RelationError>;

#[derive(Debug, Error)]
pub enum RelationError {
    /// Create was refused because the parent already owns other children.
    #[error(transparent)]
    Guard(Box<GuardViolation>),

    /// Some adds/removes failed; state was not refreshed.
    #[error(transparent)]
    PartialFailure(#[from] PartialFailure),

    /// A composite resource ID did not have the expected shape.
    #[error("invalid ID {id:?}: expected format \"{expected}\"")]
    InvalidId { id: String, expected: String },

    /// A child addressed by a singular resource is absent.
    #[error("{resource_type} {id:?} not found")]
    ChildNotFound {
        resource_type: &'static str,
        id: String,
    },

    #[error(transparent)]
    Management(#[from] ManagementError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<GuardViolation> for RelationError {
    fn from(violation: GuardViolation) -> Self {
        Self::Guard(Box::new(violation))
    }
}

impl RelationError {
    /// Render the error the way it is shown to the CLI user.
    #[must_use]
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Self::Guard(violation) => vec![violation.to_diagnostic()],
            Self::PartialFailure(failure) => vec![Diagnostic::error(
                format!(
                    "Failed to apply {} change(s) to {}",
                    failure.failures.len(),
                    failure.parent_id
                ),
                failure.to_string(),
            )],
            other => vec![Diagnostic::error(other.summary(), other.to_string())],
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            Self::Guard(_) => "Existing children would be erased",
            Self::PartialFailure(_) => "Partial failure",
            Self::InvalidId { .. } => "Invalid resource ID",
            Self::ChildNotFound { .. } => "Resource not found",
            Self::Management(_) => "Management API error",
            Self::Config(_) => "Provider configuration error",
        }
    }
}

/// Which half of a delta a failed call belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Remove,
    Update,
    Add,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remove => f.write_str("remove"),
            Self::Update => f.write_str("update"),
            Self::Add => f.write_str("add"),
        }
    }
}

/// One failed add/update/remove call.
#[derive(Debug)]
pub struct ChildFailure {
    pub kind: ChangeKind,
    /// Human-readable child identity, e.g. `con_123`.
    pub child: String,
    pub error: ManagementError,
}

impl ChildFailure {
    #[must_use]
    pub fn new(kind: ChangeKind, child: impl Into<String>, error: ManagementError) -> Self {
        Self {
            kind,
            child: child.into(),
            error,
        }
    }
}

/// Every failure accumulated while applying one delta.
#[derive(Debug)]
pub struct PartialFailure {
    pub parent_id: String,
    pub failures: Vec<ChildFailure>,
}

impl fmt::Display for PartialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} change(s) failed for {}:",
            self.failures.len(),
            self.parent_id
        )?;
        for failure in &self.failures {
            write!(
                f,
                "\n  - {} {}: {}",
                failure.kind, failure.child, failure.error
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for PartialFailure {}
