//! Desk filter engine
//!
//! Narrows a company's article list with four independent predicate
//! families combined by logical AND:
//! - free-text search over title, description, client comments, tag names
//! - exact status
//! - inclusive creation-day range
//! - tag membership (every selected tag must be present)
//!
//! # Example
//!
//! ```rust
//! use desk_filter::{FilterCriteria, FilterEngine};
//! use desk_model::{Article, ArticleStatus};
//!
//! let articles = vec![
//!     Article::new("a1", "acme", "Login bug").with_status(ArticleStatus::Production),
//!     Article::new("a2", "acme", "Login works"),
//! ];
//! let criteria = FilterCriteria::new()
//!     .with_search("login")
//!     .with_status(ArticleStatus::Production);
//!
//! let kept = FilterEngine::new().filter(&articles, &criteria);
//! assert_eq!(kept.len(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod criteria;
pub mod debounce;
pub mod engine;
pub mod predicates;

pub use criteria::FilterCriteria;
pub use debounce::{SearchDebouncer, DEFAULT_DEBOUNCE};
pub use engine::{FilterEngine, FilterSummary};
pub use predicates::{matches_date_range, matches_search, matches_status, matches_tags};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
