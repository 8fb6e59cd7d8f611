//! `akbo-core` — domain kernel building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! immutable entities with optimistic versioning, self-validating value
//! objects, and the capability every domain event implements. Time is always
//! injected by the caller; nothing here reads a clock.

pub mod entity;
pub mod error;
pub mod event;
pub mod id;
pub mod period;
pub mod time;
pub mod value_object;
pub mod version;

pub use entity::{Entity, EntityKey, EntityParts, EntityState};
pub use error::{DomainError, DomainResult};
pub use event::DomainEvent;
pub use id::{EntityId, EventId};
pub use period::Period;
pub use time::{AwareDateTime, Timestamp};
pub use value_object::{SingleValueObject, ValueObject, ValueRules};
pub use version::ExpectedVersion;
