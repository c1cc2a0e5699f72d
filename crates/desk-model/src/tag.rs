//! Company-scoped tags
//!
//! A [`Tag`] is owned by exactly one company. Articles never carry raw tag
//! ids; they carry [`TagRef`]s resolved against their company's tags.

use crate::ids::{CompanyId, TagId};
use serde::{Deserialize, Serialize};

/// Color used when a tag is created without one
pub const DEFAULT_TAG_COLOR: &str = "#3B82F6";

fn default_color() -> String {
    DEFAULT_TAG_COLOR.to_string()
}

/// Tag definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Globally unique id
    pub id: TagId,
    /// Display name (not required to be unique)
    pub name: String,
    /// Display color
    #[serde(default = "default_color")]
    pub color: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Owning company
    pub company_id: CompanyId,
}

impl Tag {
    /// Create new tag with the default color
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<TagId>, name: impl Into<String>, company_id: impl Into<CompanyId>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: default_color(),
            description: String::new(),
            company_id: company_id.into(),
        }
    }

    /// With color
    #[inline]
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Resolved reference to this tag, as attached to articles
    #[inline]
    #[must_use]
    pub fn to_ref(&self) -> TagRef {
        TagRef {
            id: self.id.clone(),
            name: self.name.clone(),
            color: self.color.clone(),
        }
    }

    /// Whether this tag may be attached to articles of `company`
    #[inline]
    #[must_use]
    pub fn belongs_to(&self, company: &CompanyId) -> bool {
        &self.company_id == company
    }
}

/// Resolved tag reference carried by an article
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagRef {
    /// Tag id
    pub id: TagId,
    /// Display name at resolution time
    pub name: String,
    /// Display color at resolution time
    #[serde(default = "default_color")]
    pub color: String,
}

/// Tag for creation (id is assigned by the store)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCreate {
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
}

impl TagCreate {
    /// Create payload with a name only
    #[inline]
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            description: None,
        }
    }

    /// Build the tag for `company` under `id`
    #[must_use]
    pub fn into_tag(self, id: TagId, company_id: CompanyId) -> Tag {
        Tag {
            id,
            name: self.name,
            color: self.color.unwrap_or_else(default_color),
            description: self.description.unwrap_or_default(),
            company_id,
        }
    }
}

/// Tag patch (all optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TagUpdate {
    /// Apply the patch in place
    pub fn apply_to(self, tag: &mut Tag) {
        if let Some(name) = self.name {
            tag.name = name;
        }
        if let Some(color) = self.color {
            tag.color = color;
        }
        if let Some(description) = self.description {
            tag.description = description;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_deserializes_with_default_color() {
        let tag: Tag =
            serde_json::from_str(r#"{"id":"t1","name":"Bug","companyId":"acme"}"#).unwrap();
        assert_eq!(tag.color, DEFAULT_TAG_COLOR);
        assert!(tag.description.is_empty());
        assert!(tag.belongs_to(&CompanyId::from("acme")));
    }

    #[test]
    fn update_only_touches_given_fields() {
        let mut tag = Tag::new("t1", "Bug", "acme").with_description("defects");
        TagUpdate {
            color: Some("#ff0000".into()),
            ..TagUpdate::default()
        }
        .apply_to(&mut tag);

        assert_eq!(tag.name, "Bug");
        assert_eq!(tag.color, "#ff0000");
        assert_eq!(tag.description, "defects");
    }

    #[test]
    fn create_payload_fills_defaults() {
        let tag = TagCreate::named("Urgent").into_tag(TagId::from("t9"), CompanyId::from("acme"));
        assert_eq!(tag.color, DEFAULT_TAG_COLOR);
        assert_eq!(tag.to_ref().name, "Urgent");
    }
}
