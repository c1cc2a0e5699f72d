//! Filter criteria
//!
//! Transient, recomputed per filtering call. Every field is optional and an
//! unset field imposes no constraint.

use chrono::NaiveDate;
use desk_model::{ArticleStatus, TagId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Independent predicates combined with logical AND
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Free-text search; normalized (trimmed, lowercased) at match time
    pub search_query: String,
    /// Exact status to keep
    pub status_filter: Option<ArticleStatus>,
    /// Inclusive lower bound on creation day
    pub date_range_start: Option<NaiveDate>,
    /// Inclusive upper bound on creation day
    pub date_range_end: Option<NaiveDate>,
    /// Tags an article must all carry
    pub selected_tag_ids: BTreeSet<TagId>,
}

impl FilterCriteria {
    /// Criteria with every field unset
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With search query
    #[inline]
    #[must_use]
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    /// With status filter
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: ArticleStatus) -> Self {
        self.status_filter = Some(status);
        self
    }

    /// With creation-day range; either bound may be open
    #[inline]
    #[must_use]
    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_range_start = start;
        self.date_range_end = end;
        self
    }

    /// Require a tag
    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<TagId>) -> Self {
        self.selected_tag_ids.insert(tag.into());
        self
    }

    /// Toggle a tag in the selection, as a tag chip click does
    pub fn toggle_tag(&mut self, tag: TagId) {
        if !self.selected_tag_ids.remove(&tag) {
            self.selected_tag_ids.insert(tag);
        }
    }

    /// Normalized search query
    #[inline]
    #[must_use]
    pub fn normalized_query(&self) -> String {
        self.search_query.trim().to_lowercase()
    }

    /// True when no predicate constrains the result
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.search_query.trim().is_empty()
            && self.status_filter.is_none()
            && self.date_range_start.is_none()
            && self.date_range_end.is_none()
            && self.selected_tag_ids.is_empty()
    }
}
