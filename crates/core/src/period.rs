//! Closed time range `[start, end]` value object.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::time::{AwareDateTime, Timestamp, ensure_not_before, require_aware};
use crate::value_object::ValueObject;

/// A closed range between two zone-aware instants with `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    start: AwareDateTime,
    end: AwareDateTime,
}

/// Boundary form: bounds arrive as text so zone-less input reports
/// `TimezoneMissing` like direct construction does.
#[derive(Deserialize)]
struct RawPeriod {
    start: String,
    end: String,
}

impl TryFrom<RawPeriod> for Period {
    type Error = DomainError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Self::new(Timestamp::parse(&raw.start)?, Timestamp::parse(&raw.end)?)
    }
}

impl Period {
    pub fn new(start: impl Into<Timestamp>, end: impl Into<Timestamp>) -> DomainResult<Self> {
        let start = require_aware(start, "start")?;
        let end = require_aware(end, "end")?;
        Self::construct(Self { start, end })
    }

    pub fn start(&self) -> AwareDateTime {
        self.start
    }

    pub fn end(&self) -> AwareDateTime {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Inclusive on both ends.
    pub fn contains(&self, instant: &AwareDateTime) -> bool {
        self.start <= *instant && *instant <= self.end
    }
}

impl ValueObject for Period {
    fn validate(&self) -> DomainResult<()> {
        ensure_not_before("start", &self.start, "end", &self.end)
    }
}
