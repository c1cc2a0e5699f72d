//! Desk facade errors

use crate::config::{ConfigError, Role};
use desk_model::CompanyId;
use desk_reconcile::ReconcileError;
use desk_store::StoreError;

/// Errors surfaced by the workspace and CLI
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Role flag does not allow the operation
    #[error("role {role} may not {action}")]
    Forbidden { role: Role, action: &'static str },

    #[error("unknown company: {0}")]
    UnknownCompany(CompanyId),

    /// Neither config nor command line named a dataset
    #[error("no dataset configured")]
    NoDataset,
}

impl DeskError {
    /// Whether retrying with another role could succeed
    #[inline]
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }
}
