//! Error types for the data model

/// Model-level errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Status string is not one of Draft, Production, Closed
    #[error("unknown article status: '{0}'")]
    UnknownStatus(String),

    /// Date string is not an ISO `YYYY-MM-DD` day
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
