//! Static JSON mock dataset
//!
//! File shape:
//!
//! ```json
//! {
//!   "companies": [{ "id": "acme", "name": "ACME Corp" }],
//!   "tags": [{ "id": "t1", "name": "Bug", "color": "#EF4444", "companyId": "acme" }],
//!   "articles": [{ "id": "a1", "title": "Login bug", "status": "Production",
//!                  "companyId": "acme", "tags": ["t1"], "createdAt": "2024-03-05" }]
//! }
//! ```
//!
//! Articles list raw tag ids here; the store resolves them on read.

use crate::error::StoreError;
use desk_model::article::lenient_status;
use desk_model::{Article, ArticleId, ArticleStatus, CompanyId, Tag, TagId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Company entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    #[serde(default)]
    pub name: String,
}

/// Article as stored: tags are ids, not resolved references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub id: ArticleId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub client_comments: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<ArticleStatus>,
    pub company_id: CompanyId,
    #[serde(default)]
    pub tags: Vec<TagId>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ArticleRecord {
    /// Article shell without tags; the caller fills in resolved refs
    #[must_use]
    pub(crate) fn to_article_shell(&self) -> Article {
        Article {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            client_comments: self.client_comments.clone(),
            status: self.status,
            company_id: self.company_id.clone(),
            tags: Vec::new(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

/// Whole mock dataset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub articles: Vec<ArticleRecord>,
}

impl Dataset {
    /// Parse dataset JSON
    ///
    /// # Errors
    /// `StoreError::Json` on malformed JSON
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a dataset file
    ///
    /// # Errors
    /// `StoreError::Io` if the file cannot be read, `StoreError::Json` if it
    /// does not decode
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| StoreError::io_error(path, e))?;
        let dataset = Self::from_json_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            companies = dataset.companies.len(),
            tags = dataset.tags.len(),
            articles = dataset.articles.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Check id uniqueness and company references
    ///
    /// Tag ids listed on articles are not checked here: stale or foreign
    /// references are dropped when the store resolves the article.
    ///
    /// # Errors
    /// `StoreError::Dataset` describing the first inconsistency
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut companies = HashSet::new();
        for company in &self.companies {
            if !companies.insert(&company.id) {
                return Err(StoreError::Dataset(format!("duplicate company id {}", company.id)));
            }
        }

        let mut tags = HashSet::new();
        for tag in &self.tags {
            if !tags.insert(&tag.id) {
                return Err(StoreError::Dataset(format!("duplicate tag id {}", tag.id)));
            }
            if !companies.contains(&tag.company_id) {
                return Err(StoreError::Dataset(format!(
                    "tag {} references unknown company {}",
                    tag.id, tag.company_id
                )));
            }
        }

        let mut articles = HashSet::new();
        for article in &self.articles {
            if !articles.insert(&article.id) {
                return Err(StoreError::Dataset(format!("duplicate article id {}", article.id)));
            }
            if !companies.contains(&article.company_id) {
                return Err(StoreError::Dataset(format!(
                    "article {} references unknown company {}",
                    article.id, article.company_id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desk_test_utils::DATASET_JSON;
    use std::io::Write;

    #[test]
    fn fixture_dataset_parses_and_validates() {
        let dataset = Dataset::from_json_str(DATASET_JSON).unwrap();
        assert_eq!(dataset.companies.len(), 2);
        assert_eq!(dataset.tags.len(), 4);
        assert_eq!(dataset.articles.len(), 4);
        dataset.validate().unwrap();
    }

    #[test]
    fn duplicate_tag_ids_are_rejected() {
        let json = r#"{
            "companies": [{"id": "acme"}],
            "tags": [
                {"id": "t1", "name": "a", "companyId": "acme"},
                {"id": "t1", "name": "b", "companyId": "acme"}
            ]
        }"#;
        let err = Dataset::from_json_str(json).unwrap().validate().unwrap_err();
        assert!(matches!(err, StoreError::Dataset(msg) if msg.contains("duplicate tag")));
    }

    #[test]
    fn article_with_unknown_company_is_rejected() {
        let json = r#"{"companies": [], "articles": [{"id": "a1", "companyId": "nowhere"}]}"#;
        let err = Dataset::from_json_str(json).unwrap().validate().unwrap_err();
        assert!(matches!(err, StoreError::Dataset(_)));
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DATASET_JSON.as_bytes()).unwrap();
        let dataset = Dataset::from_path(file.path()).unwrap();
        assert_eq!(dataset.articles[0].tags, vec![TagId::from("t1")]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Dataset::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
