//! Bulk tag reconciler
//!
//! Stateless over a store handle: presence is computed from the articles it
//! is given, and mutations are written through the store only. Local
//! articles are never patched; callers re-read after a successful apply.

use crate::error::ReconcileError;
use crate::presence::{compute_presence, mutation_targets, presence_of, PresenceMap};
use desk_model::{Article, ArticleId, CompanyId, Tag, TagId};
use desk_store::{ArticleStore, TagAction};
use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of one bulk apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    pub tag_id: TagId,
    pub action: TagAction,
    /// Articles the mutation was sent for
    pub requested: usize,
    /// Articles the store reports as changed
    pub updated_count: usize,
    pub updated_ids: Vec<ArticleId>,
    /// Tag was not in the universe; nothing was sent
    pub skipped: bool,
}

impl BulkOutcome {
    fn noop(tag_id: TagId, action: TagAction, skipped: bool) -> Self {
        Self {
            tag_id,
            action,
            requested: 0,
            updated_count: 0,
            updated_ids: Vec::new(),
            skipped,
        }
    }

    /// Store changed fewer articles than were targeted
    #[inline]
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.updated_count < self.requested
    }
}

/// Computes and applies bulk tag actions against a store
pub struct BulkTagReconciler<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> std::fmt::Debug for BulkTagReconciler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkTagReconciler").finish_non_exhaustive()
    }
}

impl<S: ?Sized> Clone for BulkTagReconciler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> BulkTagReconciler<S>
where
    S: ArticleStore + ?Sized,
{
    /// Create reconciler over `store`
    #[inline]
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Presence of every tag in `tags` across `selection`
    ///
    /// # Errors
    /// `InvalidSelection` for an empty selection
    pub fn compute_presence(&self, selection: &[Article], tags: &[Tag]) -> Result<PresenceMap, ReconcileError> {
        compute_presence(selection, tags)
    }

    /// Send `action` for `tag` to every selected article it would change
    ///
    /// The reported count is the store's, which may be lower than the
    /// number of targets if the store skipped some of them.
    ///
    /// # Errors
    /// `InvalidSelection` before any store call for an empty selection;
    /// `MutationFailure` wrapping the store's error otherwise
    pub async fn apply(
        &self,
        selection: &[Article],
        tag: &TagId,
        action: TagAction,
    ) -> Result<BulkOutcome, ReconcileError> {
        if selection.is_empty() {
            return Err(ReconcileError::InvalidSelection);
        }

        let targets = mutation_targets(selection, tag, action);
        if targets.is_empty() {
            tracing::debug!(%tag, %action, "selection already reconciled");
            return Ok(BulkOutcome::noop(tag.clone(), action, false));
        }

        tracing::info!(%tag, %action, targets = targets.len(), "applying bulk tag mutation");
        let reported = self.store.bulk_mutate_tag(&targets, tag, action).await?;
        if reported.updated_count < targets.len() {
            tracing::warn!(
                %tag,
                %action,
                requested = targets.len(),
                updated = reported.updated_count,
                "bulk tag mutation partially applied"
            );
        }

        Ok(BulkOutcome {
            tag_id: tag.clone(),
            action,
            requested: targets.len(),
            updated_count: reported.updated_count,
            updated_ids: reported.updated_ids,
            skipped: false,
        })
    }

    /// Apply the action presence dictates for `tag`
    ///
    /// A tag missing from `universe` is a zero-count no-op, since universes
    /// can be stale.
    ///
    /// # Errors
    /// As [`Self::apply`]
    pub async fn apply_for_tag(
        &self,
        selection: &[Article],
        universe: &[Tag],
        tag: &TagId,
    ) -> Result<BulkOutcome, ReconcileError> {
        if selection.is_empty() {
            return Err(ReconcileError::InvalidSelection);
        }

        if !universe.iter().any(|t| &t.id == tag) {
            tracing::debug!(%tag, "tag not in universe, skipping");
            return Ok(BulkOutcome::noop(tag.clone(), TagAction::Add, true));
        }

        let action = presence_of(selection, tag).action;
        self.apply(selection, tag, action).await
    }

    /// Re-read articles from the store, dropping ones that no longer exist
    ///
    /// # Errors
    /// `RefreshFailed` if any read fails
    pub async fn refresh(&self, ids: &[ArticleId]) -> Result<Vec<Article>, ReconcileError> {
        let fetched = try_join_all(ids.iter().map(|id| self.store.article_by_id(id)))
            .await
            .map_err(ReconcileError::RefreshFailed)?;
        Ok(fetched.into_iter().flatten().collect())
    }

    /// Current tag universe of `company`
    ///
    /// # Errors
    /// `RefreshFailed` if the read fails
    pub async fn tag_universe(&self, company: &CompanyId) -> Result<Vec<Tag>, ReconcileError> {
        self.store
            .tags_for_company(company)
            .await
            .map_err(ReconcileError::RefreshFailed)
    }
}
