//! Desk facade
//!
//! Ties configuration, tracing and the company-scoped [`Workspace`] over
//! the filter engine, in-memory store and bulk tag reconciler.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workspace;

pub use config::{ConfigError, DeskConfig, LogConfig, LogFormat, Role};
pub use error::DeskError;
pub use telemetry::init_tracing;
pub use workspace::{CompanyDesk, Workspace};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
