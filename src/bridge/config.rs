//! Bridge configuration.

use crate::topology::labels::Label;

/// What to do with a table column whose vertex set matches no mesh entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UnmatchedPolicy {
    /// Fail the call with [`UnmatchedEntity`](crate::mesh_error::MeshBridgeError::UnmatchedEntity).
    #[default]
    Error,
    /// Drop the label and log a warning.
    Warn,
    /// Drop the label silently.
    Ignore,
}

/// Options shared by import, export and refinement.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BridgeConfig {
    /// Label written for any facet or cell without one.
    pub unlabeled: Label,
    /// Constant written on the domain-tag row of every exported facet.
    pub facet_domain_tag: Label,
    /// Handling of unmatched facet/cell columns on import.
    pub unmatched: UnmatchedPolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            unlabeled: 1,
            facet_domain_tag: 1,
            unmatched: UnmatchedPolicy::Error,
        }
    }
}

impl BridgeConfig {
    pub fn with_unlabeled(mut self, value: Label) -> Self {
        self.unlabeled = value;
        self
    }

    pub fn with_facet_domain_tag(mut self, value: Label) -> Self {
        self.facet_domain_tag = value;
        self
    }

    pub fn with_unmatched(mut self, policy: UnmatchedPolicy) -> Self {
        self.unmatched = policy;
        self
    }
}
