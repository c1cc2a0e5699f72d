//! Individual filter predicates
//!
//! Each predicate is pure and total: a missing article field never panics,
//! it only fails the predicate that needed it.

use chrono::NaiveDate;
use desk_model::{Article, ArticleStatus, TagId};
use std::collections::BTreeSet;

/// Case-insensitive substring search over title, description, client
/// comments and tag names
///
/// An empty (or whitespace-only) query matches everything.
#[must_use]
pub fn matches_search(article: &Article, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    matches_normalized_search(article, &needle)
}

/// Same as [`matches_search`] with an already trimmed, lowercased needle
#[must_use]
pub fn matches_normalized_search(article: &Article, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    let hit = |field: Option<&str>| field.is_some_and(|s| s.to_lowercase().contains(needle));

    hit(article.title.as_deref())
        || hit(article.description.as_deref())
        || hit(article.client_comments.as_deref())
        || article.tags.iter().any(|t| hit(Some(t.name.as_str())))
}

/// Exact status equality; no filter matches everything
#[inline]
#[must_use]
pub fn matches_status(article: &Article, status: Option<ArticleStatus>) -> bool {
    match status {
        None => true,
        Some(wanted) => article.status == Some(wanted),
    }
}

/// Inclusive creation-day range
///
/// Bounds compare on the `YYYY-MM-DD` day, which orders the same way as the
/// ISO string. With any bound set, an article without a readable creation
/// day does not match.
#[must_use]
pub fn matches_date_range(article: &Article, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }

    let Some(day) = article.created_day() else {
        return false;
    };

    start.map_or(true, |s| s <= day) && end.map_or(true, |e| day <= e)
}

/// Subset test: the article must carry every selected tag
#[must_use]
pub fn matches_tags(article: &Article, selected: &BTreeSet<TagId>) -> bool {
    selected.iter().all(|id| article.has_tag(id))
}
