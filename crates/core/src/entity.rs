//! Entity kernel: identity + continuity across state changes.
//!
//! An [`Entity`] is modeled as an immutable value at each point of its
//! lifeline. Every transition (`update`, `archive`, `unarchive`, `add_event`)
//! returns a **new** instance and leaves the receiver untouched, so older
//! snapshots can be held and inspected freely, including from other threads.
//!
//! ## Lifeline
//!
//! ```text
//!   create(now) ──► Active ──update(now)──► Active
//!                     │  ▲
//!          archive(now)  unarchive(now)
//!                     ▼  │
//!                   Archived
//!
//!   add_event(ev): any state → same state, event queued
//!   drain_events(): any state → same state, queue emptied
//! ```
//!
//! ## Invariants
//!
//! - every timestamp is zone-aware,
//! - `updated_at >= created_at` (rehydration aligns a violating `updated_at`),
//! - `version` grows by exactly 1 per transition and never skips,
//! - `update`/`archive` reject a `now` earlier than `updated_at`.
//!
//! Equality and hashing track identity only: same [`EntityState::KIND`] and
//! same id. Two snapshots of the same entity at different versions compare
//! equal.

use core::fmt;
use core::hash::{Hash, Hasher};

use crate::error::{DomainError, DomainResult};
use crate::event::DomainEvent;
use crate::id::EntityId;
use crate::time::{AwareDateTime, Timestamp, ensure_not_before, require_aware};
use crate::version::ExpectedVersion;

/// Domain-specific fields of an entity.
///
/// Value objects embedded here are copied along on every transition.
pub trait EntityState: Clone + fmt::Debug {
    /// Kind tag (e.g. `"scores.score"`). Must be unique per entity type; it is
    /// part of the entity's identity.
    const KIND: &'static str;
}

/// The (kind, id) pair that defines entity identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    pub kind: &'static str,
    pub id: EntityId,
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Persisted parts an entity can be rebuilt from.
#[derive(Debug, Clone)]
pub struct EntityParts<S> {
    pub id: EntityId,
    pub version: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub archived_at: Option<Timestamp>,
    pub state: S,
}

/// Immutable entity snapshot with a queue of not-yet-drained events.
#[derive(Debug, Clone)]
pub struct Entity<S, E> {
    id: EntityId,
    version: u64,
    created_at: AwareDateTime,
    updated_at: AwareDateTime,
    archived_at: Option<AwareDateTime>,
    state: S,
    events: Vec<E>,
}

impl<S: EntityState, E: DomainEvent> Entity<S, E> {
    /// Create a new entity with a fresh identifier stamped with `now`.
    ///
    /// `created_at == updated_at == now`, `version == 0`, not archived, empty
    /// event queue.
    pub fn create(now: impl Into<Timestamp>, state: S) -> DomainResult<Self> {
        let now = require_aware(now, "now")?;
        Self::create_with_id(EntityId::at(now), now, state)
    }

    /// Same as [`Entity::create`] with a caller-chosen identifier.
    pub fn create_with_id(
        id: EntityId,
        now: impl Into<Timestamp>,
        state: S,
    ) -> DomainResult<Self> {
        let now = require_aware(now, "now")?;
        Ok(Self {
            id,
            version: 0,
            created_at: now,
            updated_at: now,
            archived_at: None,
            state,
            events: Vec::new(),
        })
    }

    /// Rebuild an entity from persisted parts.
    ///
    /// An `updated_at` earlier than `created_at` is aligned to `created_at`
    /// rather than rejected. The event queue starts empty.
    pub fn from_parts(parts: EntityParts<S>) -> DomainResult<Self> {
        let created_at = require_aware(parts.created_at, "created_at")?;
        let mut updated_at = require_aware(parts.updated_at, "updated_at")?;
        let archived_at = parts
            .archived_at
            .map(|ts| require_aware(ts, "archived_at"))
            .transpose()?;

        // TODO: decide whether an out-of-order updated_at should become a hard
        // construction error instead of being aligned.
        if updated_at < created_at {
            tracing::debug!(
                kind = S::KIND,
                id = %parts.id,
                %created_at,
                %updated_at,
                "aligning updated_at to created_at"
            );
            updated_at = created_at;
        }

        Ok(Self {
            id: parts.id,
            version: parts.version,
            created_at,
            updated_at,
            archived_at,
            state: parts.state,
            events: Vec::new(),
        })
    }

    /// Persistable parts of this snapshot (the event queue is not included).
    pub fn to_parts(&self) -> EntityParts<S> {
        EntityParts {
            id: self.id,
            version: self.version,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
            archived_at: self.archived_at.map(Timestamp::from),
            state: self.state.clone(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> &'static str {
        S::KIND
    }

    pub fn key(&self) -> EntityKey {
        EntityKey {
            kind: S::KIND,
            id: self.id,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> AwareDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> AwareDateTime {
        self.updated_at
    }

    pub fn archived_at(&self) -> Option<AwareDateTime> {
        self.archived_at
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Check an optimistic concurrency expectation against this snapshot.
    pub fn ensure_version(&self, expected: ExpectedVersion) -> DomainResult<()> {
        expected.check(self.version)
    }

    /// Return a new instance with the state replaced by `change(&state)`.
    pub fn update(
        &self,
        now: impl Into<Timestamp>,
        change: impl FnOnce(&S) -> S,
    ) -> DomainResult<Self> {
        self.try_update(now, |state| Ok(change(state)))
    }

    /// Like [`Entity::update`] for changes that can fail (e.g. building a
    /// value object). Time checks run before `change` is called.
    pub fn try_update(
        &self,
        now: impl Into<Timestamp>,
        change: impl FnOnce(&S) -> DomainResult<S>,
    ) -> DomainResult<Self> {
        let now = self.checked_now(now)?;
        let version = self.next_version()?;
        let state = change(&self.state)?;
        Ok(Self {
            version,
            updated_at: now,
            state,
            ..self.clone()
        })
    }

    /// Soft-delete: `archived_at = updated_at = now`.
    pub fn archive(&self, now: impl Into<Timestamp>) -> DomainResult<Self> {
        let now = self.checked_now(now)?;
        let version = self.next_version()?;
        Ok(Self {
            version,
            updated_at: now,
            archived_at: Some(now),
            ..self.clone()
        })
    }

    /// Clear the archival marker.
    ///
    /// Only zone-awareness is checked; `now` is not compared with `updated_at`.
    pub fn unarchive(&self, now: impl Into<Timestamp>) -> DomainResult<Self> {
        let now = require_aware(now, "now")?;
        let version = self.next_version()?;
        Ok(Self {
            version,
            updated_at: now,
            archived_at: None,
            ..self.clone()
        })
    }

    /// Queue `event`; `updated_at` becomes the event's occurrence time.
    pub fn add_event(&self, event: E) -> DomainResult<Self> {
        let occurred_at = event.occurred_at_checked()?;
        let version = self.next_version()?;

        tracing::trace!(
            entity = %self.key(),
            event_id = %event.event_id(),
            version,
            "domain event recorded"
        );

        let mut events = Vec::with_capacity(self.events.len() + 1);
        events.extend(self.events.iter().cloned());
        events.push(event);

        Ok(Self {
            version,
            updated_at: occurred_at,
            events,
            ..self.clone()
        })
    }

    /// Hand out the queued events in order together with a sibling instance
    /// whose queue is empty. Version and timestamps are not touched and the
    /// receiver still reports its own events.
    pub fn drain_events(&self) -> (Vec<E>, Self) {
        tracing::debug!(
            entity = %self.key(),
            count = self.events.len(),
            "draining domain events"
        );
        let drained = Self {
            id: self.id,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
            archived_at: self.archived_at,
            state: self.state.clone(),
            events: Vec::new(),
        };
        (self.events.clone(), drained)
    }

    /// Read-only view of the queue.
    pub fn peek_events(&self) -> &[E] {
        &self.events
    }

    fn checked_now(&self, now: impl Into<Timestamp>) -> DomainResult<AwareDateTime> {
        let now = require_aware(now, "now")?;
        ensure_not_before("updated_at", &self.updated_at, "now", &now)?;
        Ok(now)
    }

    fn next_version(&self) -> DomainResult<u64> {
        self.version.checked_add(1).ok_or_else(|| {
            DomainError::invariant(format!("version counter overflow for {}", self.key()))
        })
    }
}

impl<S: EntityState, E> PartialEq for Entity<S, E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<S: EntityState, E> Eq for Entity<S, E> {}

impl<S: EntityState, E> Hash for Entity<S, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        S::KIND.hash(state);
        self.id.hash(state);
    }
}
