//! Articles (tickets) and their status
//!
//! Text fields, status and timestamps are optional so that a malformed
//! record in the dataset still loads; each consumer decides what a missing
//! field means for it.

use crate::error::ModelError;
use crate::ids::{ArticleId, CompanyId, TagId};
use crate::tag::{Tag, TagRef};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Article lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArticleStatus {
    #[default]
    Draft,
    Production,
    Closed,
}

impl ArticleStatus {
    /// All statuses in display order
    pub const ALL: [ArticleStatus; 3] = [Self::Draft, Self::Production, Self::Closed];

    /// Canonical name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Production => "Production",
            Self::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownStatus(s.to_string()))
    }
}

/// Unknown status strings load as "no status" instead of failing the record
///
/// # Errors
/// Only when the value is neither a string nor null
pub fn lenient_status<'de, D>(deserializer: D) -> Result<Option<ArticleStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// Parse an ISO `YYYY-MM-DD` day
///
/// # Errors
/// `ModelError::InvalidDate` if `s` is not a calendar day in that format
pub fn parse_day(s: &str) -> Result<NaiveDate, ModelError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| ModelError::InvalidDate(s.to_string()))
}

/// Article with resolved tag references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
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
    pub tags: Vec<TagRef>,
    /// ISO-8601 timestamp or day
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Article {
    /// Create new draft article with a title
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<ArticleId>, company_id: impl Into<CompanyId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            description: None,
            client_comments: None,
            status: Some(ArticleStatus::Draft),
            company_id: company_id.into(),
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// With status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: ArticleStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With client comments
    #[inline]
    #[must_use]
    pub fn with_client_comments(mut self, comments: impl Into<String>) -> Self {
        self.client_comments = Some(comments.into());
        self
    }

    /// With a resolved tag
    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: &Tag) -> Self {
        self.tags.push(tag.to_ref());
        self
    }

    /// With creation timestamp
    #[inline]
    #[must_use]
    pub fn created(mut self, at: impl Into<String>) -> Self {
        self.created_at = Some(at.into());
        self
    }

    /// Ids of the resolved tags
    pub fn tag_ids(&self) -> impl Iterator<Item = &TagId> + '_ {
        self.tags.iter().map(|t| &t.id)
    }

    /// Whether the article carries `tag`
    #[inline]
    #[must_use]
    pub fn has_tag(&self, tag: &TagId) -> bool {
        self.tags.iter().any(|t| &t.id == tag)
    }

    /// Creation day, taken from the `YYYY-MM-DD` prefix of `created_at`
    ///
    /// `None` when the timestamp is missing or does not start with a valid day.
    #[must_use]
    pub fn created_day(&self) -> Option<NaiveDate> {
        let raw = self.created_at.as_deref()?;
        let prefix = raw.get(..10)?;
        parse_day(prefix).ok()
    }
}

/// Article for creation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub client_comments: Option<String>,
    #[serde(default)]
    pub status: ArticleStatus,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
}

impl ArticleCreate {
    /// Create payload with a title only
    #[inline]
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// With status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: ArticleStatus) -> Self {
        self.status = status;
        self
    }

    /// With tag id
    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<TagId>) -> Self {
        self.tag_ids.push(tag.into());
        self
    }
}

/// Article patch (all optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
    /// Replaces the whole tag set when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<TagId>>,
}
