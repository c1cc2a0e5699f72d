//! Company-scoped workspace
//!
//! [`Workspace`] owns the store and the role flag. Every read and write goes
//! through a [`CompanyDesk`], which pins one company: articles and tags of
//! other companies are invisible to it.

use crate::config::{DeskConfig, Role};
use crate::error::DeskError;
use desk_filter::{FilterCriteria, FilterEngine, FilterSummary, SearchDebouncer};
use desk_model::{Article, ArticleCreate, ArticleId, ArticleUpdate, CompanyId, Tag, TagCreate, TagId, TagUpdate};
use desk_reconcile::ReconcileSession;
use desk_store::{Company, Dataset, InMemoryStore, StoreError};
use std::sync::Arc;
use std::time::Duration;

/// Store plus role flag
#[derive(Debug, Clone)]
pub struct Workspace {
    store: Arc<InMemoryStore>,
    role: Role,
    engine: FilterEngine,
    search_debounce: Duration,
}

impl Workspace {
    /// Wrap an existing store
    #[must_use]
    pub fn new(store: Arc<InMemoryStore>, role: Role) -> Self {
        Self {
            store,
            role,
            engine: FilterEngine::new(),
            search_debounce: desk_filter::DEFAULT_DEBOUNCE,
        }
    }

    /// Load the configured dataset
    ///
    /// # Errors
    /// `NoDataset` if no path is configured, or the dataset load error
    pub fn from_config(config: &DeskConfig) -> Result<Self, DeskError> {
        let path = config.dataset_path.as_ref().ok_or(DeskError::NoDataset)?;
        let store = InMemoryStore::from_dataset(Dataset::from_path(path)?)?;
        Ok(Self::new(Arc::new(store), config.role).with_search_debounce(config.search_debounce()))
    }

    /// With search debounce delay
    #[inline]
    #[must_use]
    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    #[inline]
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<InMemoryStore> {
        &self.store
    }

    /// Known companies in dataset order
    #[must_use]
    pub fn companies(&self) -> Vec<Company> {
        self.store.companies()
    }

    /// Debouncer for the search box, using the configured delay
    #[must_use]
    pub fn search_debouncer(&self) -> SearchDebouncer {
        SearchDebouncer::new(self.search_debounce)
    }

    /// Desk pinned to `company`
    ///
    /// # Errors
    /// `UnknownCompany`
    pub fn company(&self, company: &CompanyId) -> Result<CompanyDesk<'_>, DeskError> {
        if !self.store.has_company(company) {
            return Err(DeskError::UnknownCompany(company.clone()));
        }
        Ok(CompanyDesk {
            workspace: self,
            company: company.clone(),
        })
    }
}

/// Operations on one company's articles and tags
#[derive(Debug, Clone)]
pub struct CompanyDesk<'a> {
    workspace: &'a Workspace,
    company: CompanyId,
}

impl CompanyDesk<'_> {
    #[inline]
    #[must_use]
    pub fn company(&self) -> &CompanyId {
        &self.company
    }

    /// Articles in dataset order
    ///
    /// # Errors
    /// Store errors
    pub fn articles(&self) -> Result<Vec<Article>, DeskError> {
        Ok(self.workspace.store.list_articles(&self.company)?)
    }

    /// Tag universe of the company
    ///
    /// # Errors
    /// Store errors
    pub fn tags(&self) -> Result<Vec<Tag>, DeskError> {
        Ok(self.workspace.store.list_tags(&self.company)?)
    }

    /// One article, `None` if missing or owned by another company
    #[must_use]
    pub fn article(&self, id: &ArticleId) -> Option<Article> {
        self.workspace
            .store
            .get_article(id)
            .filter(|a| a.company_id == self.company)
    }

    /// Visible articles for `criteria`, order preserved
    ///
    /// # Errors
    /// Store errors
    pub fn filter(&self, criteria: &FilterCriteria) -> Result<Vec<Article>, DeskError> {
        let articles = self.articles()?;
        Ok(self.workspace.engine.filter(&articles, criteria))
    }

    /// Total and matched counts for `criteria`
    ///
    /// # Errors
    /// Store errors
    pub fn summarize(&self, criteria: &FilterCriteria) -> Result<FilterSummary, DeskError> {
        let articles = self.articles()?;
        Ok(self.workspace.engine.summarize(&articles, criteria))
    }

    /// # Errors
    /// `Forbidden` for read-only roles, otherwise store errors
    pub fn create_article(&self, create: ArticleCreate) -> Result<Article, DeskError> {
        self.require(self.workspace.role.can_edit(), "create articles")?;
        Ok(self.workspace.store.create_article(&self.company, create)?)
    }

    /// # Errors
    /// `Forbidden` for read-only roles, `ArticleNotFound` for articles of
    /// other companies, otherwise store errors
    pub fn update_article(&self, id: &ArticleId, update: ArticleUpdate) -> Result<Article, DeskError> {
        self.require(self.workspace.role.can_edit(), "edit articles")?;
        self.own_article(id)?;
        Ok(self.workspace.store.update_article(id, update)?)
    }

    /// # Errors
    /// As [`Self::update_article`]
    pub fn delete_article(&self, id: &ArticleId) -> Result<(), DeskError> {
        self.require(self.workspace.role.can_edit(), "delete articles")?;
        self.own_article(id)?;
        Ok(self.workspace.store.delete_article(id)?)
    }

    /// # Errors
    /// `Forbidden` unless the role manages tags
    pub fn create_tag(&self, create: TagCreate) -> Result<Tag, DeskError> {
        self.require(self.workspace.role.can_manage_tags(), "create tags")?;
        Ok(self.workspace.store.create_tag(&self.company, create)?)
    }

    /// # Errors
    /// `Forbidden` unless the role manages tags, `TagNotFound` for tags of
    /// other companies
    pub fn update_tag(&self, id: &TagId, update: TagUpdate) -> Result<Tag, DeskError> {
        self.require(self.workspace.role.can_manage_tags(), "edit tags")?;
        self.own_tag(id)?;
        Ok(self.workspace.store.update_tag(id, update)?)
    }

    /// Returns the number of articles the tag was detached from
    ///
    /// # Errors
    /// As [`Self::update_tag`]
    pub fn delete_tag(&self, id: &TagId) -> Result<usize, DeskError> {
        self.require(self.workspace.role.can_manage_tags(), "delete tags")?;
        self.own_tag(id)?;
        Ok(self.workspace.store.delete_tag(id)?)
    }

    /// Open a bulk-tag session over the selected articles
    ///
    /// Ids that are unknown or belong to another company are rejected
    /// rather than silently dropped.
    ///
    /// # Errors
    /// `Forbidden` for read-only roles, `ArticleNotFound`, or
    /// `InvalidSelection` for an empty selection
    pub fn open_reconcile(&self, ids: &[ArticleId]) -> Result<ReconcileSession<InMemoryStore>, DeskError> {
        self.require(self.workspace.role.can_edit(), "apply bulk tag actions")?;

        let selection = ids
            .iter()
            .map(|id| self.own_article(id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut session = ReconcileSession::new(Arc::clone(&self.workspace.store));
        session.open(selection, self.tags()?)?;
        Ok(session)
    }

    fn require(&self, allowed: bool, action: &'static str) -> Result<(), DeskError> {
        if allowed {
            Ok(())
        } else {
            tracing::warn!(role = %self.workspace.role, action, "operation forbidden");
            Err(DeskError::Forbidden {
                role: self.workspace.role,
                action,
            })
        }
    }

    fn own_article(&self, id: &ArticleId) -> Result<Article, DeskError> {
        self.article(id)
            .ok_or_else(|| StoreError::ArticleNotFound(id.clone()).into())
    }

    fn own_tag(&self, id: &TagId) -> Result<(), DeskError> {
        if self.tags()?.iter().any(|t| &t.id == id) {
            Ok(())
        } else {
            Err(StoreError::TagNotFound(id.clone()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desk_model::ArticleStatus;
    use desk_test_utils::{ACME, DATASET_JSON, GLOBEX};
    use pretty_assertions::assert_eq;

    fn workspace(role: Role) -> Workspace {
        Workspace::new(Arc::new(InMemoryStore::from_json_str(DATASET_JSON).unwrap()), role)
    }

    #[test]
    fn unknown_company_is_rejected() {
        let ws = workspace(Role::Viewer);
        assert!(matches!(
            ws.company(&CompanyId::from("initech")),
            Err(DeskError::UnknownCompany(_))
        ));
    }

    #[test]
    fn desk_only_sees_its_company() {
        let ws = workspace(Role::Viewer);
        let acme = ws.company(&CompanyId::from(ACME)).unwrap();
        assert!(acme.articles().unwrap().iter().all(|a| a.company_id.as_str() == ACME));
        assert!(acme.article(&ArticleId::from("g-a1")).is_none());
        assert_eq!(acme.tags().unwrap().len(), 3);
    }

    #[test]
    fn filter_goes_through_engine() {
        let ws = workspace(Role::Viewer);
        let acme = ws.company(&CompanyId::from(ACME)).unwrap();
        let criteria = FilterCriteria::new().with_status(ArticleStatus::Production);
        let ids: Vec<_> = acme.filter(&criteria).unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![ArticleId::from("a1"), ArticleId::from("a3")]);
        assert_eq!(acme.summarize(&criteria).unwrap().hidden(), 1);
    }

    #[test]
    fn viewer_cannot_mutate() {
        let ws = workspace(Role::Viewer);
        let acme = ws.company(&CompanyId::from(ACME)).unwrap();
        assert!(acme.create_article(ArticleCreate::titled("x")).unwrap_err().is_forbidden());
        assert!(acme.open_reconcile(&[ArticleId::from("a1")]).unwrap_err().is_forbidden());
    }

    #[test]
    fn editor_cannot_manage_tags() {
        let ws = workspace(Role::Editor);
        let acme = ws.company(&CompanyId::from(ACME)).unwrap();
        assert!(acme.create_tag(TagCreate::named("Ops")).unwrap_err().is_forbidden());
        assert!(acme.create_article(ArticleCreate::titled("x")).is_ok());
    }

    #[test]
    fn cross_company_ids_are_not_found() {
        let ws = workspace(Role::Admin);
        let acme = ws.company(&CompanyId::from(ACME)).unwrap();
        assert!(matches!(
            acme.delete_article(&ArticleId::from("g-a1")),
            Err(DeskError::Store(StoreError::ArticleNotFound(_)))
        ));
        assert!(matches!(
            acme.delete_tag(&TagId::from("g1")),
            Err(DeskError::Store(StoreError::TagNotFound(_)))
        ));
        assert!(matches!(
            acme.open_reconcile(&[ArticleId::from("a1"), ArticleId::from("g-a1")]),
            Err(DeskError::Store(StoreError::ArticleNotFound(_)))
        ));

        let globex = ws.company(&CompanyId::from(GLOBEX)).unwrap();
        assert_eq!(globex.articles().unwrap().len(), 1);
    }

    #[test]
    fn admin_deletes_tag_and_detaches_it() {
        let ws = workspace(Role::Admin);
        let acme = ws.company(&CompanyId::from(ACME)).unwrap();
        assert_eq!(acme.delete_tag(&TagId::from("t1")).unwrap(), 1);
        assert!(!acme.article(&ArticleId::from("a1")).unwrap().has_tag(&TagId::from("t1")));

        let session = acme.open_reconcile(&[ArticleId::from("a1"), ArticleId::from("a2")]).unwrap();
        assert!(session.presence().get(&TagId::from("t1")).is_none());
        assert!(session
            .selection()
            .iter()
            .all(|a| !a.has_tag(&TagId::from("t1"))));
    }

    #[test]
    fn repeated_ids_open_one_entry_per_article() {
        let ws = workspace(Role::Editor);
        let acme = ws.company(&CompanyId::from(ACME)).unwrap();
        let a1 = ArticleId::from("a1");
        let a2 = ArticleId::from("a2");

        let session = acme.open_reconcile(&[a1.clone(), a1, a2]).unwrap();
        assert_eq!(session.selection().len(), 2);
        let t1 = session.presence()[&TagId::from("t1")];
        assert_eq!((t1.present_count, t1.missing_count), (1, 1));
    }
}
