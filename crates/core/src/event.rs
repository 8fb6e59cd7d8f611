//! Domain event capability.

use crate::error::DomainResult;
use crate::id::EventId;
use crate::time::{AwareDateTime, Timestamp};

/// Minimal contract every domain event satisfies: an identifier and an
/// occurrence timestamp.
///
/// Events are facts. They are immutable once built and are queued on the
/// entity they describe until a collaborator drains them. Any type can take
/// part by implementing these two accessors; richer behavior (type tags,
/// payloads, outbox records) lives in `akbo-events`.
pub trait DomainEvent: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Unique identifier of this event instance.
    fn event_id(&self) -> EventId;

    /// When the event occurred (business time, injected by the caller).
    fn occurred_at(&self) -> Timestamp;

    /// The occurrence timestamp, rejected with `TimezoneMissing` when zone-less.
    fn occurred_at_checked(&self) -> DomainResult<AwareDateTime> {
        self.occurred_at().require_aware("event.occurred_at")
    }
}
