//! Desk article store
//!
//! - [`ArticleStore`]: the async interface the reconciler consumes
//!   (tag universe per company, single-article fetch, bulk tag mutation)
//! - [`InMemoryStore`]: the mock backend, loaded from a static JSON
//!   [`Dataset`], with company-scoped CRUD over articles and tags
//!
//! # Example
//!
//! ```rust,ignore
//! use desk_store::{ArticleStore, InMemoryStore, TagAction};
//!
//! let store = InMemoryStore::from_json_str(&std::fs::read_to_string("data/mock.json")?)?;
//! let outcome = store
//!     .bulk_mutate_tag(&[article_id], &tag_id, TagAction::Add)
//!     .await?;
//! println!("updated {}", outcome.updated_count);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod dataset;
pub mod error;
pub mod memory;
pub mod store;

pub use dataset::{ArticleRecord, Company, Dataset};
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use store::{ArticleStore, MutationOutcome, TagAction};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
