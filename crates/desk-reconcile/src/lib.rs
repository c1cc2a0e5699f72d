//! Desk bulk tag reconciliation
//!
//! Given a selection of articles and a company's tag universe:
//! - [`compute_presence`] counts, per tag, how many selected articles carry
//!   it and classifies the bulk action (`Remove` only when all do)
//! - [`BulkTagReconciler`] sends that action to the store for exactly the
//!   articles it would change and reports the store's count
//! - [`ReconcileSession`] drives the confirm-before-apply flow and
//!   recomputes every tag's presence after each successful apply
//!
//! # Example
//!
//! ```rust,ignore
//! use desk_reconcile::ReconcileSession;
//!
//! let mut session = ReconcileSession::new(store.clone());
//! session.open(selection, tags)?;
//! session.select(&tag_id)?;
//! let outcome = session.confirm().await?;
//! println!("{} articles updated", outcome.updated_count);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod presence;
pub mod reconciler;
pub mod session;
pub mod state;

pub use error::ReconcileError;
pub use presence::{compute_presence, mutation_targets, PresenceMap, TagPresence};
pub use reconciler::{BulkOutcome, BulkTagReconciler};
pub use session::{PendingAction, ReconcileSession};
pub use state::{allowed_transitions, validate_transition, ReconcileState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
