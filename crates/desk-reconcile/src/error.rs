//! Error types for bulk tag reconciliation

use crate::state::ReconcileState;
use desk_store::StoreError;

/// Reconciliation errors
///
/// Only precondition violations originate here; store failures are wrapped
/// untouched so callers can tell causes apart.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// Reconciliation over an empty selection
    #[error("selection is empty")]
    InvalidSelection,

    /// The store rejected the bulk mutation
    #[error("bulk mutation failed: {0}")]
    MutationFailure(#[from] StoreError),

    /// Re-reading articles or tags failed; any mutation before it stands
    #[error("refresh failed: {0}")]
    RefreshFailed(#[source] StoreError),

    /// Operation not valid in the current session state
    #[error("illegal transition: {from:?} -> {to:?}")]
    IllegalTransition {
        from: ReconcileState,
        to: ReconcileState,
    },

    /// Confirmation requested with no tag selected
    #[error("no pending tag action to confirm")]
    NoPendingAction,
}
