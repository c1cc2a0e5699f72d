//! Desk data model
//!
//! Company-scoped articles and tags:
//! - [`Article`]: a ticket carrying resolved [`TagRef`]s
//! - [`Tag`]: a label owned by exactly one company
//! - Create/update payloads used by the store's CRUD surface

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod article;
pub mod error;
pub mod ids;
pub mod tag;

pub use article::{parse_day, Article, ArticleCreate, ArticleStatus, ArticleUpdate};
pub use error::ModelError;
pub use ids::{ArticleId, CompanyId, TagId};
pub use tag::{Tag, TagCreate, TagRef, TagUpdate, DEFAULT_TAG_COLOR};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
