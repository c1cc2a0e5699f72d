//! In-memory mock store
//!
//! Backs the whole application with the static dataset. Records keep raw
//! tag ids; every read resolves them against the owning company's tags so
//! callers only ever see [`TagRef`]s of the right company.

use crate::dataset::{ArticleRecord, Company, Dataset};
use crate::error::StoreError;
use crate::store::{ArticleStore, MutationOutcome, TagAction};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use desk_model::{
    Article, ArticleCreate, ArticleId, ArticleUpdate, CompanyId, Tag, TagCreate, TagId, TagRef, TagUpdate,
};
use indexmap::IndexMap;
use parking_lot::RwLock;

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Default)]
struct StoreState {
    companies: IndexMap<CompanyId, Company>,
    tags: IndexMap<TagId, Tag>,
    articles: IndexMap<ArticleId, ArticleRecord>,
}

impl StoreState {
    fn resolve(&self, record: &ArticleRecord) -> Article {
        let mut article = record.to_article_shell();
        article.tags = record
            .tags
            .iter()
            .filter_map(|id| self.resolve_tag(id, &record.company_id, &record.id))
            .collect();
        article
    }

    fn resolve_tag(&self, id: &TagId, company: &CompanyId, article: &ArticleId) -> Option<TagRef> {
        let Some(tag) = self.tags.get(id) else {
            tracing::debug!(%article, tag = %id, "dropping reference to unknown tag");
            return None;
        };
        if !tag.belongs_to(company) {
            tracing::warn!(%article, tag = %id, %company, owner = %tag.company_id, "dropping cross-company tag");
            return None;
        }
        Some(tag.to_ref())
    }

    fn require_company(&self, company: &CompanyId) -> Result<(), StoreError> {
        if self.companies.contains_key(company) {
            Ok(())
        } else {
            Err(StoreError::UnknownCompany(company.clone()))
        }
    }

    fn check_tags(&self, company: &CompanyId, ids: &[TagId]) -> Result<(), StoreError> {
        for id in ids {
            let tag = self.tags.get(id).ok_or_else(|| StoreError::TagNotFound(id.clone()))?;
            if !tag.belongs_to(company) {
                return Err(StoreError::CompanyMismatch {
                    tag: id.clone(),
                    company: company.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Company-scoped CRUD over an in-memory dataset
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build store from a validated dataset
    ///
    /// # Errors
    /// `StoreError::Dataset` if the dataset fails validation
    pub fn from_dataset(dataset: Dataset) -> Result<Self, StoreError> {
        dataset.validate()?;

        let state = StoreState {
            companies: dataset.companies.into_iter().map(|c| (c.id.clone(), c)).collect(),
            tags: dataset.tags.into_iter().map(|t| (t.id.clone(), t)).collect(),
            articles: dataset.articles.into_iter().map(|a| (a.id.clone(), a)).collect(),
        };

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Parse, validate and load dataset JSON
    ///
    /// # Errors
    /// See [`Dataset::from_json_str`] and [`Self::from_dataset`]
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        Self::from_dataset(Dataset::from_json_str(json)?)
    }

    /// All companies in dataset order
    #[must_use]
    pub fn companies(&self) -> Vec<Company> {
        self.state.read().companies.values().cloned().collect()
    }

    /// Whether the company exists
    #[must_use]
    pub fn has_company(&self, company: &CompanyId) -> bool {
        self.state.read().companies.contains_key(company)
    }

    /// Resolved articles of a company in insertion order
    ///
    /// # Errors
    /// `StoreError::UnknownCompany`
    pub fn list_articles(&self, company: &CompanyId) -> Result<Vec<Article>, StoreError> {
        let state = self.state.read();
        state.require_company(company)?;
        Ok(state
            .articles
            .values()
            .filter(|r| &r.company_id == company)
            .map(|r| state.resolve(r))
            .collect())
    }

    /// Tags of a company in insertion order
    ///
    /// # Errors
    /// `StoreError::UnknownCompany`
    pub fn list_tags(&self, company: &CompanyId) -> Result<Vec<Tag>, StoreError> {
        let state = self.state.read();
        state.require_company(company)?;
        Ok(state.tags.values().filter(|t| t.belongs_to(company)).cloned().collect())
    }

    /// Single resolved article
    #[must_use]
    pub fn get_article(&self, id: &ArticleId) -> Option<Article> {
        let state = self.state.read();
        state.articles.get(id).map(|r| state.resolve(r))
    }

    /// Create an article in `company`
    ///
    /// # Errors
    /// `UnknownCompany`, `TagNotFound`, or `CompanyMismatch` for a tag of
    /// another company
    pub fn create_article(&self, company: &CompanyId, create: ArticleCreate) -> Result<Article, StoreError> {
        let mut state = self.state.write();
        state.require_company(company)?;
        state.check_tags(company, &create.tag_ids)?;

        let stamp = now();
        let record = ArticleRecord {
            id: ArticleId::generate(),
            title: Some(create.title),
            description: create.description,
            client_comments: create.client_comments,
            status: Some(create.status),
            company_id: company.clone(),
            tags: dedup(create.tag_ids),
            created_at: Some(stamp.clone()),
            updated_at: Some(stamp),
        };
        tracing::info!(article = %record.id, %company, "created article");

        let article = state.resolve(&record);
        state.articles.insert(record.id.clone(), record);
        Ok(article)
    }

    /// Patch an article
    ///
    /// # Errors
    /// `ArticleNotFound`, or a tag error when the patch replaces tags
    pub fn update_article(&self, id: &ArticleId, update: ArticleUpdate) -> Result<Article, StoreError> {
        let mut state = self.state.write();
        let company = state
            .articles
            .get(id)
            .map(|r| r.company_id.clone())
            .ok_or_else(|| StoreError::ArticleNotFound(id.clone()))?;
        if let Some(tag_ids) = &update.tag_ids {
            state.check_tags(&company, tag_ids)?;
        }

        let record = state
            .articles
            .get_mut(id)
            .ok_or_else(|| StoreError::ArticleNotFound(id.clone()))?;
        if let Some(title) = update.title {
            record.title = Some(title);
        }
        if let Some(description) = update.description {
            record.description = Some(description);
        }
        if let Some(comments) = update.client_comments {
            record.client_comments = Some(comments);
        }
        if let Some(status) = update.status {
            record.status = Some(status);
        }
        if let Some(tag_ids) = update.tag_ids {
            record.tags = dedup(tag_ids);
        }
        record.updated_at = Some(now());
        tracing::info!(article = %id, "updated article");

        let record = record.clone();
        Ok(state.resolve(&record))
    }

    /// Delete an article
    ///
    /// # Errors
    /// `ArticleNotFound`
    pub fn delete_article(&self, id: &ArticleId) -> Result<(), StoreError> {
        let removed = self.state.write().articles.shift_remove(id);
        match removed {
            Some(_) => {
                tracing::info!(article = %id, "deleted article");
                Ok(())
            }
            None => Err(StoreError::ArticleNotFound(id.clone())),
        }
    }

    /// Create a tag in `company`
    ///
    /// # Errors
    /// `UnknownCompany`
    pub fn create_tag(&self, company: &CompanyId, create: TagCreate) -> Result<Tag, StoreError> {
        let mut state = self.state.write();
        state.require_company(company)?;

        let tag = create.into_tag(TagId::generate(), company.clone());
        tracing::info!(tag = %tag.id, %company, name = %tag.name, "created tag");
        state.tags.insert(tag.id.clone(), tag.clone());
        Ok(tag)
    }

    /// Patch a tag; articles see the change on their next read
    ///
    /// # Errors
    /// `TagNotFound`
    pub fn update_tag(&self, id: &TagId, update: TagUpdate) -> Result<Tag, StoreError> {
        let mut state = self.state.write();
        let tag = state
            .tags
            .get_mut(id)
            .ok_or_else(|| StoreError::TagNotFound(id.clone()))?;
        update.apply_to(tag);
        tracing::info!(tag = %id, "updated tag");
        Ok(tag.clone())
    }

    /// Delete a tag and detach it from every article
    ///
    /// Returns the number of articles that carried it.
    ///
    /// # Errors
    /// `TagNotFound`
    pub fn delete_tag(&self, id: &TagId) -> Result<usize, StoreError> {
        let mut state = self.state.write();
        if state.tags.shift_remove(id).is_none() {
            return Err(StoreError::TagNotFound(id.clone()));
        }

        let stamp = now();
        let mut detached = 0;
        for record in state.articles.values_mut() {
            let before = record.tags.len();
            record.tags.retain(|t| t != id);
            if record.tags.len() != before {
                record.updated_at = Some(stamp.clone());
                detached += 1;
            }
        }
        tracing::info!(tag = %id, detached, "deleted tag");
        Ok(detached)
    }

    fn mutate_tag(&self, ids: &[ArticleId], tag: &TagId, action: TagAction) -> Result<MutationOutcome, StoreError> {
        let mut state = self.state.write();
        let owner = state
            .tags
            .get(tag)
            .map(|t| t.company_id.clone())
            .ok_or_else(|| StoreError::TagNotFound(tag.clone()))?;

        let stamp = now();
        let mut outcome = MutationOutcome::unchanged();
        for id in ids {
            let Some(record) = state.articles.get_mut(id) else {
                tracing::debug!(article = %id, "skipping unknown article");
                continue;
            };
            if record.company_id != owner {
                tracing::warn!(article = %id, %tag, "skipping article of another company");
                continue;
            }

            let present = record.tags.contains(tag);
            let changed = match action {
                TagAction::Add if !present => {
                    record.tags.push(tag.clone());
                    true
                }
                TagAction::Remove if present => {
                    record.tags.retain(|t| t != tag);
                    true
                }
                _ => false,
            };

            if changed {
                record.updated_at = Some(stamp.clone());
                outcome.updated_ids.push(id.clone());
            }
        }
        outcome.updated_count = outcome.updated_ids.len();

        tracing::info!(%tag, %action, requested = ids.len(), updated = outcome.updated_count, "bulk tag mutation");
        Ok(outcome)
    }
}

fn dedup(ids: Vec<TagId>) -> Vec<TagId> {
    let mut out: Vec<TagId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

#[async_trait]
impl ArticleStore for InMemoryStore {
    async fn tags_for_company(&self, company: &CompanyId) -> Result<Vec<Tag>, StoreError> {
        self.list_tags(company)
    }

    async fn article_by_id(&self, id: &ArticleId) -> Result<Option<Article>, StoreError> {
        Ok(self.get_article(id))
    }

    async fn bulk_mutate_tag(
        &self,
        ids: &[ArticleId],
        tag: &TagId,
        action: TagAction,
    ) -> Result<MutationOutcome, StoreError> {
        self.mutate_tag(ids, tag, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desk_model::ArticleStatus;
    use desk_test_utils::{ACME, DATASET_JSON, GLOBEX};
    use pretty_assertions::assert_eq;

    fn store() -> InMemoryStore {
        InMemoryStore::from_json_str(DATASET_JSON).unwrap()
    }

    fn acme() -> CompanyId {
        CompanyId::from(ACME)
    }

    #[test]
    fn resolution_drops_cross_company_tags() {
        let store = store();
        let a3 = store.get_article(&ArticleId::from("a3")).unwrap();
        let ids: Vec<&str> = a3.tags.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "t3"]);
        assert_eq!(a3.tags[0].name, "Billing");
    }

    #[test]
    fn listing_is_company_scoped_and_ordered() {
        let store = store();
        let ids: Vec<String> = store
            .list_articles(&acme())
            .unwrap()
            .into_iter()
            .map(|a| a.id.0)
            .collect();
        assert_eq!(ids, vec!["a1", "a2", "a3"]);

        let globex = store.list_tags(&CompanyId::from(GLOBEX)).unwrap();
        assert_eq!(globex.len(), 1);
        assert!(matches!(
            store.list_articles(&CompanyId::from("initech")),
            Err(StoreError::UnknownCompany(_))
        ));
    }

    #[test]
    fn create_article_rejects_foreign_tag() {
        let store = store();
        let err = store
            .create_article(&acme(), ArticleCreate::titled("x").with_tag("g1"))
            .unwrap_err();
        assert!(matches!(err, StoreError::CompanyMismatch { .. }));

        let created = store
            .create_article(
                &acme(),
                ArticleCreate::titled("Checkout fails")
                    .with_status(ArticleStatus::Production)
                    .with_tag("t2")
                    .with_tag("t2"),
            )
            .unwrap();
        assert_eq!(created.tags.len(), 1);
        assert!(created.created_at.is_some());
        assert_eq!(store.list_articles(&acme()).unwrap().len(), 4);
    }

    #[test]
    fn update_article_patches_fields() {
        let store = store();
        let updated = store
            .update_article(
                &ArticleId::from("a2"),
                ArticleUpdate {
                    status: Some(ArticleStatus::Closed),
                    tag_ids: Some(vec![TagId::from("t3")]),
                    ..ArticleUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, Some(ArticleStatus::Closed));
        assert_eq!(updated.title.as_deref(), Some("Login works"));
        assert!(updated.has_tag(&TagId::from("t3")));
    }

    #[test]
    fn tag_rename_is_visible_on_articles() {
        let store = store();
        store
            .update_tag(
                &TagId::from("t1"),
                TagUpdate {
                    name: Some("Auth".into()),
                    ..TagUpdate::default()
                },
            )
            .unwrap();
        let a1 = store.get_article(&ArticleId::from("a1")).unwrap();
        assert_eq!(a1.tags[0].name, "Auth");
    }

    #[test]
    fn delete_tag_detaches_everywhere() {
        let store = store();
        let detached = store.delete_tag(&TagId::from("t1")).unwrap();
        assert_eq!(detached, 1);
        assert!(store
            .list_articles(&acme())
            .unwrap()
            .iter()
            .all(|a| !a.has_tag(&TagId::from("t1"))));
        assert!(matches!(
            store.delete_tag(&TagId::from("t1")),
            Err(StoreError::TagNotFound(_))
        ));
    }

    #[test]
    fn delete_article() {
        let store = store();
        store.delete_article(&ArticleId::from("a1")).unwrap();
        assert!(store.get_article(&ArticleId::from("a1")).is_none());
        assert!(store.delete_article(&ArticleId::from("a1")).is_err());
    }

    #[tokio::test]
    async fn bulk_add_counts_only_changes() {
        let store = store();
        let ids = vec![ArticleId::from("a1"), ArticleId::from("a2")];

        let outcome = store.bulk_mutate_tag(&ids, &TagId::from("t1"), TagAction::Add).await.unwrap();
        assert_eq!(outcome.updated_count, 1);
        assert_eq!(outcome.updated_ids, vec![ArticleId::from("a2")]);

        let again = store.bulk_mutate_tag(&ids, &TagId::from("t1"), TagAction::Add).await.unwrap();
        assert_eq!(again.updated_count, 0);
    }

    #[tokio::test]
    async fn bulk_mutation_skips_other_companies_and_unknown_ids() {
        let store = store();
        let ids = vec![
            ArticleId::from("g-a1"),
            ArticleId::from("missing"),
            ArticleId::from("a2"),
        ];
        let outcome = store.bulk_mutate_tag(&ids, &TagId::from("t3"), TagAction::Add).await.unwrap();
        assert_eq!(outcome.updated_ids, vec![ArticleId::from("a2")]);

        let err = store
            .bulk_mutate_tag(&ids, &TagId::from("nope"), TagAction::Remove)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::TagNotFound(_)));
    }

    #[tokio::test]
    async fn trait_reads_resolve_tags() {
        let store = store();
        let tags = store.tags_for_company(&acme()).await.unwrap();
        assert_eq!(tags.len(), 3);
        let a1 = store.article_by_id(&ArticleId::from("a1")).await.unwrap().unwrap();
        assert!(a1.has_tag(&TagId::from("t1")));
        assert!(store.article_by_id(&ArticleId::from("zz")).await.unwrap().is_none());
    }
}
