//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is raised synchronously at the point of violation and is
/// never retried inside the kernel. An operation that fails leaves every
/// previously returned instance untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A timestamp field or parameter carried no UTC offset.
    #[error("{field} must be a timezone-aware timestamp (UTC recommended)")]
    TimezoneMissing { field: &'static str },

    /// A proposed later timestamp precedes the required earlier one.
    #[error("{later} must not be earlier than {earlier}")]
    TimestampOrder {
        earlier: &'static str,
        later: &'static str,
    },

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A conflict occurred (e.g. stale version / optimistic concurrency).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn timezone_missing(field: &'static str) -> Self {
        Self::TimezoneMissing { field }
    }

    pub fn timestamp_order(earlier: &'static str, later: &'static str) -> Self {
        Self::TimestampOrder { earlier, later }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// True for the two timestamp failure kinds (missing zone, wrong order).
    pub fn is_timestamp_error(&self) -> bool {
        matches!(
            self,
            Self::TimezoneMissing { .. } | Self::TimestampOrder { .. }
        )
    }
}
