//! Reconciliation session
//!
//! One session per bulk-tag dialog. All state lives on the session value;
//! operations take `&mut self`, which serializes transitions for a given
//! session. Re-opening discards whatever the previous invocation left.

use crate::error::ReconcileError;
use crate::presence::{compute_presence, PresenceMap, TagPresence};
use crate::reconciler::{BulkOutcome, BulkTagReconciler};
use crate::state::{validate_transition, ReconcileState};
use desk_model::{Article, ArticleId, CompanyId, Tag, TagId};
use desk_store::{ArticleStore, TagAction};
use std::collections::HashSet;
use std::sync::Arc;

/// Tag picked for mutation, awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub tag_id: TagId,
    pub action: TagAction,
    /// Presence at the time the tag was picked
    pub presence: TagPresence,
}

/// Stateful bulk-tag reconciliation over one selection
pub struct ReconcileSession<S: ?Sized> {
    reconciler: BulkTagReconciler<S>,
    state: ReconcileState,
    company: Option<CompanyId>,
    selection: Vec<Article>,
    universe: Vec<Tag>,
    presence: PresenceMap,
    pending: Option<PendingAction>,
    last_outcome: Option<BulkOutcome>,
    last_error: Option<String>,
}

impl<S: ?Sized> std::fmt::Debug for ReconcileSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconcileSession")
            .field("state", &self.state)
            .field("company", &self.company)
            .field("selection", &self.selection.len())
            .field("tags", &self.universe.len())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<S> ReconcileSession<S>
where
    S: ArticleStore + ?Sized,
{
    /// Create idle session over `store`
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_reconciler(BulkTagReconciler::new(store))
    }

    /// Create idle session around an existing reconciler
    #[must_use]
    pub fn with_reconciler(reconciler: BulkTagReconciler<S>) -> Self {
        Self {
            reconciler,
            state: ReconcileState::Idle,
            company: None,
            selection: Vec::new(),
            universe: Vec::new(),
            presence: PresenceMap::new(),
            pending: None,
            last_outcome: None,
            last_error: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> ReconcileState {
        self.state
    }

    /// Presence view; kept intact across a failed apply
    #[inline]
    #[must_use]
    pub fn presence(&self) -> &PresenceMap {
        &self.presence
    }

    #[inline]
    #[must_use]
    pub fn selection(&self) -> &[Article] {
        &self.selection
    }

    #[inline]
    #[must_use]
    pub fn universe(&self) -> &[Tag] {
        &self.universe
    }

    #[inline]
    #[must_use]
    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn last_outcome(&self) -> Option<&BulkOutcome> {
        self.last_outcome.as_ref()
    }

    /// Message of the last failure, until acknowledged or re-opened
    #[inline]
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start over with a new selection and tag universe
    ///
    /// Repeated articles count once, at their first position. The company
    /// used for refreshing the universe after an apply is the first selected
    /// article's.
    ///
    /// # Errors
    /// `InvalidSelection` for an empty selection; the session is left idle
    pub fn open(&mut self, mut selection: Vec<Article>, universe: Vec<Tag>) -> Result<&PresenceMap, ReconcileError> {
        self.close();

        let mut seen = HashSet::new();
        selection.retain(|a| seen.insert(a.id.clone()));

        let presence = compute_presence(&selection, &universe)?;
        self.transition(ReconcileState::PresenceComputed)?;

        self.company = selection.first().map(|a| a.company_id.clone());
        self.selection = selection;
        self.universe = universe;
        self.presence = presence;
        tracing::debug!(
            selected = self.selection.len(),
            tags = self.universe.len(),
            "reconcile session opened"
        );
        Ok(&self.presence)
    }

    /// Pick a tag; its precomputed action waits for [`Self::confirm`]
    ///
    /// Returns `None` and stays put when the tag is not in the current view.
    ///
    /// # Errors
    /// `IllegalTransition` unless presence has been computed
    pub fn select(&mut self, tag: &TagId) -> Result<Option<&PendingAction>, ReconcileError> {
        validate_transition(self.state, ReconcileState::ConfirmPending)?;

        let Some(presence) = self.presence.get(tag).copied() else {
            tracing::debug!(%tag, "selected tag not in presence view");
            return Ok(None);
        };

        self.transition(ReconcileState::ConfirmPending)?;
        self.pending = Some(PendingAction {
            tag_id: tag.clone(),
            action: presence.action,
            presence,
        });
        Ok(self.pending.as_ref())
    }

    /// Back out of a pending confirmation
    ///
    /// # Errors
    /// `IllegalTransition` when nothing is pending
    pub fn cancel(&mut self) -> Result<(), ReconcileError> {
        if self.state != ReconcileState::ConfirmPending {
            return Err(ReconcileError::IllegalTransition {
                from: self.state,
                to: ReconcileState::PresenceComputed,
            });
        }
        self.transition(ReconcileState::PresenceComputed)?;
        self.pending = None;
        Ok(())
    }

    /// Apply the pending action, then re-read the selection and universe and
    /// recompute presence for every tag
    ///
    /// If the apply fails the session moves to `Error` and the previous
    /// presence view is left untouched. If only the refresh fails, the
    /// store's outcome is still recorded in [`Self::last_outcome`] before the
    /// session moves to `Error`. Articles deleted meanwhile drop out of the
    /// selection; if none remain, presence is empty.
    ///
    /// # Errors
    /// `IllegalTransition` before [`Self::open`], `NoPendingAction` if no tag
    /// was selected, `MutationFailure` if the store rejected the mutation,
    /// `RefreshFailed` if the mutation went through but re-reading did not
    pub async fn confirm(&mut self) -> Result<BulkOutcome, ReconcileError> {
        match self.state {
            ReconcileState::ConfirmPending => {}
            ReconcileState::Idle => {
                return Err(ReconcileError::IllegalTransition {
                    from: ReconcileState::Idle,
                    to: ReconcileState::Applying,
                })
            }
            _ => return Err(ReconcileError::NoPendingAction),
        }
        let pending = self.pending.take().ok_or(ReconcileError::NoPendingAction)?;
        self.transition(ReconcileState::Applying)?;

        let applied = self
            .reconciler
            .apply(&self.selection, &pending.tag_id, pending.action)
            .await;
        let outcome = match applied {
            Ok(outcome) => outcome,
            Err(err) => return self.fail(&pending.tag_id, err),
        };
        self.last_outcome = Some(outcome.clone());

        let reread = self.reread().await;
        match reread {
            Ok((selection, universe, presence)) => {
                self.selection = selection;
                self.universe = universe;
                self.presence = presence;
                self.last_error = None;
                self.transition(ReconcileState::PresenceComputed)?;
                tracing::info!(
                    tag = %outcome.tag_id,
                    action = %outcome.action,
                    updated = outcome.updated_count,
                    "bulk tag action applied"
                );
                Ok(outcome)
            }
            Err(err) => self.fail(&pending.tag_id, err),
        }
    }

    async fn reread(&self) -> Result<(Vec<Article>, Vec<Tag>, PresenceMap), ReconcileError> {
        let ids: Vec<ArticleId> = self.selection.iter().map(|a| a.id.clone()).collect();
        let selection = self.reconciler.refresh(&ids).await?;
        let universe = match &self.company {
            Some(company) => self.reconciler.tag_universe(company).await?,
            None => self.universe.clone(),
        };
        let presence = if selection.is_empty() {
            PresenceMap::new()
        } else {
            compute_presence(&selection, &universe)?
        };

        Ok((selection, universe, presence))
    }

    fn fail(&mut self, tag: &TagId, err: ReconcileError) -> Result<BulkOutcome, ReconcileError> {
        tracing::warn!(%tag, error = %err, "bulk tag action failed");
        self.last_error = Some(err.to_string());
        self.transition(ReconcileState::Error)?;
        Err(err)
    }

    /// Dismiss a failure and return to the kept presence view
    ///
    /// # Errors
    /// `IllegalTransition` unless the session is in `Error`
    pub fn acknowledge_error(&mut self) -> Result<(), ReconcileError> {
        if self.state != ReconcileState::Error {
            return Err(ReconcileError::IllegalTransition {
                from: self.state,
                to: ReconcileState::PresenceComputed,
            });
        }
        self.transition(ReconcileState::PresenceComputed)?;
        self.last_error = None;
        Ok(())
    }

    /// Drop all session state
    pub fn close(&mut self) {
        self.state = ReconcileState::Idle;
        self.company = None;
        self.selection.clear();
        self.universe.clear();
        self.presence.clear();
        self.pending = None;
        self.last_outcome = None;
        self.last_error = None;
    }

    fn transition(&mut self, to: ReconcileState) -> Result<(), ReconcileError> {
        validate_transition(self.state, to)?;
        tracing::trace!(from = ?self.state, ?to, "reconcile transition");
        self.state = to;
        Ok(())
    }
}
