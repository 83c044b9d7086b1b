//! Per-operation context handed to every resource lifecycle call.

use auth0_management::{ManagementClient, ManagementConfig};

use crate::error::RelationResult;
use crate::guard::GuardEquality;
use crate::locks::KeyedLocks;

/// Tunables for reconciliation behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// How the create-time guard compares existing and desired children.
    pub guard_equality: GuardEquality,
}

/// Client handle and lock registry shared by all resources of one provider
/// instance.
///
/// Cloning is cheap; clones share the lock registry.
#[derive(Debug, Clone)]
pub struct ProviderContext {
    client: ManagementClient,
    locks: KeyedLocks,
    options: ReconcileOptions,
}

impl ProviderContext {
    #[must_use]
    pub fn new(client: ManagementClient) -> Self {
        Self {
            client,
            locks: KeyedLocks::new(),
            options: ReconcileOptions::default(),
        }
    }

    pub fn from_config(config: &ManagementConfig) -> RelationResult<Self> {
        Ok(Self::new(ManagementClient::new(config)?))
    }

    #[must_use]
    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn client(&self) -> &ManagementClient {
        &self.client
    }

    #[must_use]
    pub fn locks(&self) -> &KeyedLocks {
        &self.locks
    }

    #[must_use]
    pub fn options(&self) -> ReconcileOptions {
        self.options
    }
}
