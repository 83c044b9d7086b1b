//! Create-time check that refuses to overwrite children a parent already has.
//!
//! A plural resource created against a parent with existing children that
//! differ from the configured set would silently detach them. Instead the
//! user is told to import the parent's current children first.

use std::collections::HashSet;
use std::fmt;

use crate::child::ChildReference;
use crate::diagnostics::Diagnostic;

/// How existing and desired children are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GuardEquality {
    /// Same keys in the same order.
    #[default]
    Ordered,
    /// Same keys in any order.
    Unordered,
}

/// What a create may do after the guard passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The parent has no children; apply the desired set.
    Proceed,
    /// The parent already has exactly the desired children.
    AlreadySatisfied,
}

/// Refused create of a plural resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardViolation {
    pub resource_type: &'static str,
    pub children_label: &'static str,
    pub parent_id: String,
    pub existing: Vec<String>,
    pub desired: Vec<String>,
}

impl GuardViolation {
    /// `terraform import <resource_type>.<name> <parent_id>`
    #[must_use]
    pub fn import_command(&self) -> String {
        format!(
            "terraform import {}.<name> {}",
            self.resource_type, self.parent_id
        )
    }

    /// Line diff of the existing list against the desired list.
    #[must_use]
    pub fn render_diff(&self) -> String {
        let desired: HashSet<&str> = self.desired.iter().map(String::as_str).collect();
        let existing: HashSet<&str> = self.existing.iter().map(String::as_str).collect();

        let mut out = String::from("--- existing\n+++ desired\n  [\n");
        for label in &self.existing {
            let marker = if desired.contains(label.as_str()) { ' ' } else { '-' };
            out.push_str(&format!("{marker}   \"{label}\",\n"));
        }
        for label in &self.desired {
            if !existing.contains(label.as_str()) {
                out.push_str(&format!("+   \"{label}\",\n"));
            }
        }
        out.push_str("  ]");
        out
    }

    #[must_use]
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(
            format!("Parent {} already has {}", self.parent_id, self.children_label),
            self.to_string(),
        )
    }
}

impl fmt::Display for GuardViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cannot create {} for {}: it already has {} that differ from the configuration.\n\n\
             {}\n\n\
             Import the existing {} first and reconcile the configuration with them:\n\n  {}",
            self.resource_type,
            self.parent_id,
            self.children_label,
            self.render_diff(),
            self.children_label,
            self.import_command()
        )
    }
}

impl std::error::Error for GuardViolation {}

/// Decide whether a create may run against `existing` children.
///
/// Empty `existing` always proceeds. Non-empty `existing` equal to
/// `desired` (per `equality`, by key) is already satisfied; anything else
/// is a violation.
pub fn guard_against_erasing<T: ChildReference>(
    resource_type: &'static str,
    children_label: &'static str,
    parent_id: &str,
    existing: &[T],
    desired: &[T],
    equality: GuardEquality,
) -> Result<GuardOutcome, GuardViolation> {
    if existing.is_empty() {
        return Ok(GuardOutcome::Proceed);
    }

    let equal = match equality {
        GuardEquality::Ordered => {
            existing.len() == desired.len()
                && existing.iter().zip(desired).all(|(e, d)| e.key() == d.key())
        }
        GuardEquality::Unordered => {
            let existing_keys: HashSet<T::Key> = existing.iter().map(T::key).collect();
            let desired_keys: HashSet<T::Key> = desired.iter().map(T::key).collect();
            existing_keys == desired_keys
        }
    };

    if equal {
        return Ok(GuardOutcome::AlreadySatisfied);
    }

    Err(GuardViolation {
        resource_type,
        children_label,
        parent_id: parent_id.to_string(),
        existing: existing.iter().map(ChildReference::label).collect(),
        desired: desired.iter().map(ChildReference::label).collect(),
    })
}
