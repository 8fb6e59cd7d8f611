//! Outbox conversion errors.

use akbo_core::DomainError;
use thiserror::Error;

/// Failure while projecting an event into its payload or outbox record.
#[derive(Debug, Error)]
pub enum OutboxError {
    /// The event violated a kernel invariant (e.g. zone-less occurrence time).
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("failed to serialize payload of {event_type}: {source}")]
    Serialize {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("payload of {event_type} must serialize to a JSON object")]
    PayloadNotAnObject { event_type: String },

    #[error("payload of {event_type} uses reserved field {field:?}")]
    ReservedField { event_type: String, field: String },
}
