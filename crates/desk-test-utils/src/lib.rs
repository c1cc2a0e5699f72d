//! Testing utilities for the desk workspace
//!
//! Shared fixtures: a small two-company dataset and article builders.

#![allow(missing_docs)]

use desk_model::{Article, ArticleStatus, Tag};

pub const ACME: &str = "acme";
pub const GLOBEX: &str = "globex";

/// Tags of both fixture companies; `t1`..`t3` are ACME's, `g1` is Globex's
pub fn fixture_tags() -> Vec<Tag> {
    vec![
        Tag::new("t1", "Authentication", ACME).with_color("#EF4444"),
        Tag::new("t2", "Billing", ACME).with_color("#10B981"),
        Tag::new("t3", "Urgent", ACME).with_color("#F59E0B"),
        Tag::new("g1", "Authentication", GLOBEX),
    ]
}

pub fn tag(id: &str) -> Tag {
    fixture_tags()
        .into_iter()
        .find(|t| t.id.as_str() == id)
        .unwrap_or_else(|| panic!("no fixture tag {id}"))
}

/// Article in ACME created on `day` carrying `tags` (fixture tag ids)
pub fn article(id: &str, title: &str, status: ArticleStatus, day: &str, tags: &[&str]) -> Article {
    tags.iter().fold(
        Article::new(id, ACME, title).with_status(status).created(format!("{day}T09:00:00Z")),
        |a, t| a.with_tag(&tag(t)),
    )
}

/// The canonical two-article login scenario
pub fn login_scenario() -> Vec<Article> {
    vec![
        article("a1", "Login bug", ArticleStatus::Production, "2024-03-05", &["t1"]),
        article("a2", "Login works", ArticleStatus::Draft, "2024-03-06", &[]),
    ]
}

/// A wider ACME article set
pub fn acme_articles() -> Vec<Article> {
    vec![
        article("a1", "Login bug", ArticleStatus::Production, "2024-03-05", &["t1"]),
        article("a2", "Login works", ArticleStatus::Draft, "2024-03-06", &[]),
        article("a3", "Invoice totals off", ArticleStatus::Production, "2024-04-01", &["t2", "t3"])
            .with_description("Rounding error on invoices")
            .with_client_comments("Customer escalated"),
        article("a4", "Password reset mail", ArticleStatus::Closed, "2024-04-15", &["t1", "t3"]),
    ]
}

/// Static JSON dataset in the mock file format
pub const DATASET_JSON: &str = r##"{
  "companies": [
    { "id": "acme", "name": "ACME Corp" },
    { "id": "globex", "name": "Globex" }
  ],
  "tags": [
    { "id": "t1", "name": "Authentication", "color": "#EF4444", "companyId": "acme" },
    { "id": "t2", "name": "Billing", "color": "#10B981", "companyId": "acme" },
    { "id": "t3", "name": "Urgent", "color": "#F59E0B", "companyId": "acme" },
    { "id": "g1", "name": "Authentication", "companyId": "globex" }
  ],
  "articles": [
    { "id": "a1", "title": "Login bug", "status": "Production", "companyId": "acme",
      "tags": ["t1"], "createdAt": "2024-03-05T09:00:00Z", "updatedAt": "2024-03-05T09:00:00Z" },
    { "id": "a2", "title": "Login works", "status": "Draft", "companyId": "acme",
      "tags": [], "createdAt": "2024-03-06T09:00:00Z" },
    { "id": "a3", "title": "Invoice totals off", "description": "Rounding error on invoices",
      "clientComments": "Customer escalated", "status": "Production", "companyId": "acme",
      "tags": ["t2", "t3", "g1"], "createdAt": "2024-04-01T09:00:00Z" },
    { "id": "g-a1", "title": "SSO outage", "status": "Closed", "companyId": "globex",
      "tags": ["g1"], "createdAt": "2024-02-01T09:00:00Z" }
  ]
}"##;
