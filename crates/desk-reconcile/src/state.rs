//! Reconcile session states and the transitions allowed between them

use crate::error::ReconcileError;
use serde::Serialize;

/// Reconciliation session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReconcileState {
    /// Nothing opened
    Idle,
    /// Presence computed for the current selection
    PresenceComputed,
    /// A tag was picked; waiting for explicit confirmation
    ConfirmPending,
    /// Bulk mutation in flight
    Applying,
    /// Last apply failed; the previous presence view is kept
    Error,
}

/// Validates a state transition.
///
/// # Errors
/// `ReconcileError::IllegalTransition` when `to` is not reachable from `from`
pub fn validate_transition(from: ReconcileState, to: ReconcileState) -> Result<(), ReconcileError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(ReconcileError::IllegalTransition { from, to })
    }
}

#[must_use]
pub fn allowed_transitions(from: ReconcileState) -> Vec<ReconcileState> {
    use ReconcileState::*;
    match from {
        Idle => vec![PresenceComputed],
        PresenceComputed => vec![ConfirmPending, Idle],
        ConfirmPending => vec![Applying, PresenceComputed, Idle],
        Applying => vec![PresenceComputed, Error],
        Error => vec![PresenceComputed, Idle],
    }
}

fn allowed(from: ReconcileState, to: ReconcileState) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}
