//! Outbox records: the standardized serialization of an event for reliable
//! external delivery.
//!
//! The kernel only projects events into records. Durably storing a drained
//! batch exactly once is the persistence collaborator's job.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use akbo_core::{DomainEvent, Entity, EntityState};

use crate::error::OutboxError;

/// Event that can be rendered into an [`OutboxRecord`].
pub trait OutboxEvent: DomainEvent {
    /// Stable event type tag.
    fn event_type(&self) -> &str;

    /// Business content: every field except the identifier and the
    /// occurrence timestamp.
    fn payload(&self) -> Result<Map<String, Value>, OutboxError>;

    fn to_outbox_record(&self) -> Result<OutboxRecord, OutboxError> {
        let occurred_at = self.occurred_at_checked()?;
        Ok(OutboxRecord {
            id: self.event_id().to_string(),
            event_type: self.event_type().to_string(),
            occurred_at: occurred_at.to_rfc3339_opts(SecondsFormat::AutoSi, false),
            payload: self.payload()?,
        })
    }
}

/// Four-key record: `id`, `type`, `occurred_at` (RFC 3339 with offset) and
/// `payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxRecord {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    occurred_at: String,
    payload: Map<String, Value>,
}

impl OutboxRecord {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn occurred_at(&self) -> &str {
        &self.occurred_at
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn into_payload(self) -> Map<String, Value> {
        self.payload
    }

    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "type": self.event_type,
            "occurred_at": self.occurred_at,
            "payload": self.payload,
        })
    }
}

/// Render a drained batch in order. Fails on the first event that cannot be
/// rendered.
pub fn to_records<E: OutboxEvent>(events: &[E]) -> Result<Vec<OutboxRecord>, OutboxError> {
    let records = events
        .iter()
        .map(OutboxEvent::to_outbox_record)
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = records.len(), "rendered outbox records");
    Ok(records)
}

/// Drain `entity` and render the batch.
///
/// On error nothing is lost: the receiver still holds its queued events.
pub fn drain_records<S, E>(
    entity: &Entity<S, E>,
) -> Result<(Vec<OutboxRecord>, Entity<S, E>), OutboxError>
where
    S: EntityState,
    E: OutboxEvent,
{
    let (events, drained) = entity.drain_events();
    let records = to_records(&events)?;
    Ok((records, drained))
}
