//! Domain events: reusable base event, explicit type tags, payload
//! projection and outbox records.
//!
//! Events are produced by domain logic, queued on the entity they describe
//! and drained by a collaborator that renders them with
//! [`OutboxEvent::to_outbox_record`].

pub mod base;
pub mod error;
pub mod outbox;

pub use base::{BaseDomainEvent, EventPayload, RESERVED_FIELDS};
pub use error::OutboxError;
pub use outbox::{OutboxEvent, OutboxRecord, drain_records, to_records};
