//! Filter engine
//!
//! A pure function of `(articles, criteria) -> articles`. The engine keeps no
//! state between calls, so concurrent views each hold their own criteria and
//! a stale call can never corrupt a fresh one.

use crate::criteria::FilterCriteria;
use crate::predicates::{matches_date_range, matches_normalized_search, matches_status, matches_tags};
use desk_model::Article;

/// Result counts for one filtering pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    /// Articles considered
    pub total: usize,
    /// Articles kept
    pub matched: usize,
}

impl FilterSummary {
    /// Articles filtered out
    #[inline]
    #[must_use]
    pub fn hidden(&self) -> usize {
        self.total - self.matched
    }
}

/// Stable multi-predicate filter
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterEngine;

impl FilterEngine {
    /// Create new engine
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Whether `article` satisfies every predicate family in `criteria`
    #[must_use]
    pub fn matches(&self, article: &Article, criteria: &FilterCriteria) -> bool {
        let needle = criteria.normalized_query();
        self.matches_with_needle(article, criteria, &needle)
    }

    fn matches_with_needle(&self, article: &Article, criteria: &FilterCriteria, needle: &str) -> bool {
        matches_normalized_search(article, needle)
            && matches_status(article, criteria.status_filter)
            && matches_date_range(article, criteria.date_range_start, criteria.date_range_end)
            && matches_tags(article, &criteria.selected_tag_ids)
    }

    /// Borrowing filter preserving input order
    #[must_use]
    pub fn filter_refs<'a>(&self, articles: &'a [Article], criteria: &FilterCriteria) -> Vec<&'a Article> {
        let needle = criteria.normalized_query();
        articles
            .iter()
            .filter(|a| self.matches_with_needle(a, criteria, &needle))
            .collect()
    }

    /// Owned filter preserving input order
    #[must_use]
    pub fn filter(&self, articles: &[Article], criteria: &FilterCriteria) -> Vec<Article> {
        let kept: Vec<Article> = self
            .filter_refs(articles, criteria)
            .into_iter()
            .cloned()
            .collect();

        tracing::debug!(total = articles.len(), matched = kept.len(), "filtered articles");
        kept
    }

    /// Filter and report counts
    #[must_use]
    pub fn summarize(&self, articles: &[Article], criteria: &FilterCriteria) -> FilterSummary {
        FilterSummary {
            total: articles.len(),
            matched: self.filter_refs(articles, criteria).len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desk_model::{ArticleStatus, Tag};
    use pretty_assertions::assert_eq;

    fn ids(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn login_production_scenario() {
        let t1 = Tag::new("t1", "Auth", "acme");
        let articles = vec![
            Article::new("a1", "acme", "Login bug")
                .with_status(ArticleStatus::Production)
                .with_tag(&t1),
            Article::new("a2", "acme", "Login works").with_status(ArticleStatus::Draft),
        ];
        let criteria = FilterCriteria::new()
            .with_search("login")
            .with_status(ArticleStatus::Production);

        let result = FilterEngine::new().filter(&articles, &criteria);
        assert_eq!(ids(&result), vec!["a1"]);
    }

    #[test]
    fn unconstrained_criteria_is_identity() {
        let articles = vec![
            Article::new("a1", "acme", "one"),
            Article::new("a2", "acme", "two"),
            Article::new("a3", "acme", "three"),
        ];
        let result = FilterEngine::new().filter(&articles, &FilterCriteria::default());
        assert_eq!(result, articles);
    }

    #[test]
    fn order_is_preserved() {
        let articles = vec![
            Article::new("z", "acme", "bug c"),
            Article::new("a", "acme", "feature"),
            Article::new("m", "acme", "bug a"),
        ];
        let result = FilterEngine::new().filter(&articles, &FilterCriteria::new().with_search("bug"));
        assert_eq!(ids(&result), vec!["z", "m"]);
    }

    #[test]
    fn summary_counts_hidden() {
        let articles = vec![
            Article::new("a1", "acme", "bug"),
            Article::new("a2", "acme", "feature"),
        ];
        let summary = FilterEngine::new().summarize(&articles, &FilterCriteria::new().with_search("bug"));
        assert_eq!(summary, FilterSummary { total: 2, matched: 1 });
        assert_eq!(summary.hidden(), 1);
    }
}
