//! Store interface consumed by the reconciler
//!
//! The store owns the article/tag universe. Callers read resolved articles
//! and write only through [`ArticleStore::bulk_mutate_tag`].

use crate::error::StoreError;
use async_trait::async_trait;
use desk_model::{Article, ArticleId, CompanyId, Tag, TagId};
use serde::{Deserialize, Serialize};

/// Bulk tag mutation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagAction {
    /// Attach the tag where it is missing
    Add,
    /// Detach the tag where it is present
    Remove,
}

impl TagAction {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

impl std::fmt::Display for TagAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a bulk mutation as reported by the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    /// Articles whose tag set actually changed
    pub updated_count: usize,
    /// Ids of those articles
    #[serde(default)]
    pub updated_ids: Vec<ArticleId>,
}

impl MutationOutcome {
    /// Outcome for a mutation that changed nothing
    #[inline]
    #[must_use]
    pub fn unchanged() -> Self {
        Self::default()
    }
}

/// Article/tag data source
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Tags owned by `company`
    async fn tags_for_company(&self, company: &CompanyId) -> Result<Vec<Tag>, StoreError>;

    /// Single resolved article
    async fn article_by_id(&self, id: &ArticleId) -> Result<Option<Article>, StoreError>;

    /// Add or remove `tag` on every listed article
    ///
    /// Must be idempotent: articles already in the requested state are not
    /// counted in the outcome.
    async fn bulk_mutate_tag(
        &self,
        ids: &[ArticleId],
        tag: &TagId,
        action: TagAction,
    ) -> Result<MutationOutcome, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_wire_names() {
        assert_eq!(serde_json::to_string(&TagAction::Add).unwrap(), "\"add\"");
        assert_eq!(
            serde_json::from_str::<TagAction>("\"remove\"").unwrap(),
            TagAction::Remove
        );
        assert_eq!(TagAction::Remove.to_string(), "remove");
    }
}
