//! Per-tag presence over a selection
//!
//! Presence is a view, recomputed from scratch whenever the selection or the
//! underlying articles change. Nothing here is cached between calls.

use crate::error::ReconcileError;
use desk_model::{Article, ArticleId, Tag, TagId};
use desk_store::TagAction;
use indexmap::IndexMap;
use serde::Serialize;

/// Presence of one tag across a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPresence {
    /// Selected articles carrying the tag
    pub present_count: usize,
    /// Selected articles lacking the tag
    pub missing_count: usize,
    /// `Remove` iff every selected article carries the tag
    pub action: TagAction,
}

impl TagPresence {
    /// Classify from a present count and the selection size
    #[must_use]
    pub fn from_counts(present_count: usize, selection_size: usize) -> Self {
        let missing_count = selection_size.saturating_sub(present_count);
        let action = if present_count == selection_size {
            TagAction::Remove
        } else {
            TagAction::Add
        };
        Self {
            present_count,
            missing_count,
            action,
        }
    }

    /// Size of the selection this presence was computed over
    #[inline]
    #[must_use]
    pub fn selection_size(&self) -> usize {
        self.present_count + self.missing_count
    }

    /// Every selected article carries the tag
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_count == 0
    }

    /// Some but not all selected articles carry the tag
    #[inline]
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.present_count > 0 && self.missing_count > 0
    }
}

/// Presence per tag, ordered like the tag universe
pub type PresenceMap = IndexMap<TagId, TagPresence>;

/// Presence of a single tag; the selection must be non-empty
#[must_use]
pub(crate) fn presence_of(selection: &[Article], tag: &TagId) -> TagPresence {
    let present = selection.iter().filter(|a| a.has_tag(tag)).count();
    TagPresence::from_counts(present, selection.len())
}

/// Presence of every tag of `tags` across `selection`
///
/// # Errors
/// `ReconcileError::InvalidSelection` for an empty selection
pub fn compute_presence(selection: &[Article], tags: &[Tag]) -> Result<PresenceMap, ReconcileError> {
    if selection.is_empty() {
        return Err(ReconcileError::InvalidSelection);
    }

    Ok(tags
        .iter()
        .map(|tag| (tag.id.clone(), presence_of(selection, &tag.id)))
        .collect())
}

/// Articles a mutation of `tag` would touch
///
/// `Add` targets articles missing the tag, `Remove` those carrying it.
#[must_use]
pub fn mutation_targets(selection: &[Article], tag: &TagId, action: TagAction) -> Vec<ArticleId> {
    selection
        .iter()
        .filter(|a| match action {
            TagAction::Add => !a.has_tag(tag),
            TagAction::Remove => a.has_tag(tag),
        })
        .map(|a| a.id.clone())
        .collect()
}
