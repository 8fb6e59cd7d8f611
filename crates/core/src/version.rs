//! Optimistic version expectations.

use crate::error::{DomainError, DomainResult};

/// Optimistic concurrency expectation for an entity.
///
/// Detection only: a persistence layer compares the version an update was
/// derived from against the stored one and rejects the stale write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Accept any snapshot (e.g. the first write of a freshly created entity).
    Any,
    /// Require the snapshot to be at exactly this version, i.e. the version
    /// the pending change was derived from.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}
