//! Reusable base event with aggregate metadata and payload projection.

use serde::Serialize;
use serde_json::{Map, Value};

use akbo_core::time::require_aware;
use akbo_core::{
    AwareDateTime, DomainEvent, DomainResult, Entity, EntityId, EntityState, EventId, Timestamp,
};

use crate::error::OutboxError;
use crate::outbox::OutboxEvent;

/// Keys owned by [`BaseDomainEvent`]; a body must not reuse them.
pub const RESERVED_FIELDS: [&str; 5] = [
    "id",
    "occurred_at",
    "aggregate_id",
    "aggregate_type",
    "version",
];

/// Business content of an event.
///
/// Every payload type declares its tag explicitly. Tags are stable
/// identifiers consumed by outbox readers, so they must be globally unique
/// (e.g. `"scores.score.recorded"`).
pub trait EventPayload: Serialize + Clone + core::fmt::Debug + Send + Sync + 'static {
    const EVENT_TYPE: &'static str;
}

/// Domain event carrying a payload `P` plus optional aggregate metadata.
///
/// The identifier defaults to a fresh [`EventId`] stamped with the
/// occurrence time, which is always injected and must be zone-aware.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseDomainEvent<P> {
    id: EventId,
    occurred_at: AwareDateTime,
    aggregate_id: Option<EntityId>,
    aggregate_type: Option<String>,
    version: Option<u64>,
    body: P,
}

impl<P: EventPayload> BaseDomainEvent<P> {
    pub fn new(occurred_at: impl Into<Timestamp>, body: P) -> DomainResult<Self> {
        let occurred_at = require_aware(occurred_at, "occurred_at")?;
        Ok(Self {
            id: EventId::at(occurred_at),
            occurred_at,
            aggregate_id: None,
            aggregate_type: None,
            version: None,
            body,
        })
    }

    /// Event about `entity`, stamped with its id, kind and current version.
    pub fn about<S, E>(
        entity: &Entity<S, E>,
        occurred_at: impl Into<Timestamp>,
        body: P,
    ) -> DomainResult<Self>
    where
        S: EntityState,
        E: DomainEvent,
    {
        Ok(Self::new(occurred_at, body)?.with_aggregate(entity.id(), S::KIND, entity.version()))
    }

    pub fn with_id(self, id: EventId) -> Self {
        Self { id, ..self }
    }

    pub fn with_aggregate(
        self,
        aggregate_id: EntityId,
        aggregate_type: impl Into<String>,
        version: u64,
    ) -> Self {
        Self {
            aggregate_id: Some(aggregate_id),
            aggregate_type: Some(aggregate_type.into()),
            version: Some(version),
            ..self
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn aggregate_id(&self) -> Option<EntityId> {
        self.aggregate_id
    }

    pub fn aggregate_type(&self) -> Option<&str> {
        self.aggregate_type.as_deref()
    }

    /// Version of the aggregate snapshot the event was derived from.
    pub fn aggregate_version(&self) -> Option<u64> {
        self.version
    }

    pub fn body(&self) -> &P {
        &self.body
    }

    pub fn into_body(self) -> P {
        self.body
    }
}

impl<P: EventPayload> DomainEvent for BaseDomainEvent<P> {
    fn event_id(&self) -> EventId {
        self.id
    }

    fn occurred_at(&self) -> Timestamp {
        Timestamp::Aware(self.occurred_at)
    }
}

impl<P: EventPayload> OutboxEvent for BaseDomainEvent<P> {
    fn event_type(&self) -> &str {
        P::EVENT_TYPE
    }

    /// Every field except `id` and `occurred_at`: the aggregate metadata
    /// (null when absent) followed by the body's fields.
    fn payload(&self) -> Result<Map<String, Value>, OutboxError> {
        let mut payload = Map::new();
        payload.insert(
            "aggregate_id".to_string(),
            self.aggregate_id
                .map_or(Value::Null, |id| Value::String(id.to_string())),
        );
        payload.insert(
            "aggregate_type".to_string(),
            self.aggregate_type.clone().map_or(Value::Null, Value::String),
        );
        payload.insert(
            "version".to_string(),
            self.version.map_or(Value::Null, Value::from),
        );

        let body = serde_json::to_value(&self.body).map_err(|source| OutboxError::Serialize {
            event_type: P::EVENT_TYPE.to_string(),
            source,
        })?;

        match body {
            Value::Null => {}
            Value::Object(fields) => {
                for (key, value) in fields {
                    if RESERVED_FIELDS.contains(&key.as_str()) {
                        return Err(OutboxError::ReservedField {
                            event_type: P::EVENT_TYPE.to_string(),
                            field: key,
                        });
                    }
                    payload.insert(key, value);
                }
            }
            _ => {
                return Err(OutboxError::PayloadNotAnObject {
                    event_type: P::EVENT_TYPE.to_string(),
                });
            }
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akbo_core::DomainError;
    use chrono::{Duration, FixedOffset, NaiveDate, TimeZone};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct ScoreCreated {
        value: i32,
    }

    impl EventPayload for ScoreCreated {
        const EVENT_TYPE: &'static str = "score.created";
    }

    #[derive(Debug, Clone, Serialize)]
    struct Ping;

    impl EventPayload for Ping {
        const EVENT_TYPE: &'static str = "test.ping";
    }

    #[derive(Debug, Clone, Serialize)]
    struct Note(String);

    impl EventPayload for Note {
        const EVENT_TYPE: &'static str = "test.note";
    }

    #[derive(Debug, Clone, Serialize)]
    struct Clashing {
        id: u32,
    }

    impl EventPayload for Clashing {
        const EVENT_TYPE: &'static str = "test.clashing";
    }

    #[derive(Debug, Clone)]
    struct Score;

    impl EntityState for Score {
        const KIND: &'static str = "Score";
    }

    fn t0() -> AwareDateTime {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .unwrap()
    }

    #[test]
    fn requires_aware_occurred_at() {
        let naive = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let err = BaseDomainEvent::new(naive, Ping).unwrap_err();
        assert_eq!(err, DomainError::TimezoneMissing { field: "occurred_at" });
    }

    #[test]
    fn accepts_aware_occurred_at() {
        let event = BaseDomainEvent::new(t0(), Ping).unwrap();
        assert_eq!(event.occurred_at_checked().unwrap(), t0());
        assert_eq!(event.aggregate_id(), None);
        assert_eq!(event.aggregate_type(), None);
        assert_eq!(event.aggregate_version(), None);
    }

    #[test]
    fn fresh_events_get_distinct_ids() {
        let a = BaseDomainEvent::new(t0(), Ping).unwrap();
        let b = BaseDomainEvent::new(t0(), Ping).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.event_id(), a.id());
    }

    #[test]
    fn generated_id_is_stamped_with_occurred_at() {
        let event = BaseDomainEvent::new(t0(), Ping).unwrap();
        let (secs, _) = event.id().as_uuid().get_timestamp().unwrap().to_unix();
        assert_eq!(secs, t0().timestamp() as u64);
    }

    #[test]
    fn with_id_overrides_generated_id() {
        let id = EventId::new();
        let event = BaseDomainEvent::new(t0(), Ping).unwrap().with_id(id);
        assert_eq!(event.id(), id);
    }

    #[test]
    fn event_type_is_the_declared_tag() {
        let event = BaseDomainEvent::new(t0(), ScoreCreated { value: 1 }).unwrap();
        assert_eq!(event.event_type(), "score.created");
    }

    #[test]
    fn payload_excludes_id_and_occurred_at() {
        let aggregate_id = EntityId::new();
        let event = BaseDomainEvent::new(t0(), ScoreCreated { value: 42 })
            .unwrap()
            .with_aggregate(aggregate_id, "Score", 3);

        let payload = event.payload().unwrap();
        assert!(!payload.contains_key("id"));
        assert!(!payload.contains_key("occurred_at"));
        assert_eq!(
            Value::Object(payload),
            json!({
                "aggregate_id": aggregate_id.to_string(),
                "aggregate_type": "Score",
                "version": 3,
                "value": 42,
            })
        );
    }

    #[test]
    fn payload_keeps_absent_metadata_as_null() {
        let payload = BaseDomainEvent::new(t0(), Ping).unwrap().payload().unwrap();
        assert_eq!(
            Value::Object(payload),
            json!({
                "aggregate_id": null,
                "aggregate_type": null,
                "version": null,
            })
        );
    }

    #[test]
    fn non_object_body_is_rejected() {
        let event = BaseDomainEvent::new(t0(), Note("hi".into())).unwrap();
        match event.payload().unwrap_err() {
            OutboxError::PayloadNotAnObject { event_type } => assert_eq!(event_type, "test.note"),
            other => panic!("Expected PayloadNotAnObject, got {other:?}"),
        }
    }

    #[test]
    fn reserved_body_field_is_rejected() {
        let event = BaseDomainEvent::new(t0(), Clashing { id: 1 }).unwrap();
        match event.payload().unwrap_err() {
            OutboxError::ReservedField { field, .. } => assert_eq!(field, "id"),
            other => panic!("Expected ReservedField, got {other:?}"),
        }
    }

    #[test]
    fn about_stamps_entity_metadata() {
        let entity = Entity::<Score, BaseDomainEvent<ScoreCreated>>::create(t0(), Score).unwrap();
        let event = BaseDomainEvent::about(
            &entity,
            t0() + Duration::seconds(1),
            ScoreCreated { value: 7 },
        )
        .unwrap();

        assert_eq!(event.aggregate_id(), Some(entity.id()));
        assert_eq!(event.aggregate_type(), Some("Score"));
        assert_eq!(event.aggregate_version(), Some(0));
        assert_eq!(event.body(), &ScoreCreated { value: 7 });
    }

    #[test]
    fn outbox_record_has_four_keys() {
        let event = BaseDomainEvent::new(t0(), ScoreCreated { value: 1 }).unwrap();
        let record = event.to_outbox_record().unwrap();

        assert_eq!(record.id(), event.id().to_string());
        assert_eq!(record.event_type(), "score.created");
        assert_eq!(record.occurred_at(), "2025-01-01T00:00:00+09:00");

        let json = record.to_json();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 4);
        for key in ["id", "type", "occurred_at", "payload"] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }
}
