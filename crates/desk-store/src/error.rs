//! Error types for the article store

use desk_model::{ArticleId, CompanyId, TagId};
use std::path::PathBuf;

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Company is not part of the dataset
    #[error("unknown company: {0}")]
    UnknownCompany(CompanyId),

    /// Article id not found
    #[error("article not found: {0}")]
    ArticleNotFound(ArticleId),

    /// Tag id not found
    #[error("tag not found: {0}")]
    TagNotFound(TagId),

    /// Tag belongs to a different company than the article it targets
    #[error("tag {tag} does not belong to company {company}")]
    CompanyMismatch { tag: TagId, company: CompanyId },

    /// Backend refused the request
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Dataset is inconsistent
    #[error("invalid dataset: {0}")]
    Dataset(String),

    /// IO error reading a dataset file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dataset JSON could not be decoded
    #[error("dataset json: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
