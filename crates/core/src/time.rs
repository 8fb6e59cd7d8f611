//! Zone-aware timestamp handling.
//!
//! The kernel never reads a clock. Callers hand in timestamps as [`Timestamp`],
//! which may or may not carry a UTC offset; every entry point converts it to an
//! [`AwareDateTime`] through [`require_aware`] and rejects zone-less values with
//! [`DomainError::TimezoneMissing`].

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone};

use crate::error::{DomainError, DomainResult};

/// A timestamp that is known to carry its UTC offset.
pub type AwareDateTime = DateTime<FixedOffset>;

/// Naive layouts accepted by [`Timestamp::parse`] when no offset is present.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A timestamp as supplied by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Carries an explicit offset (the original offset is preserved).
    Aware(AwareDateTime),
    /// Zone-less wall-clock time. Never accepted by the kernel.
    Naive(NaiveDateTime),
}

impl Timestamp {
    /// Parse RFC 3339 text (aware) or ISO-8601 text without an offset (naive).
    pub fn parse(text: &str) -> DomainResult<Self> {
        let text = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Self::Aware(dt));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .map(Self::Naive)
            .ok_or_else(|| DomainError::validation(format!("unparseable timestamp: {text:?}")))
    }

    pub fn is_aware(&self) -> bool {
        matches!(self, Self::Aware(_))
    }

    pub fn aware(&self) -> Option<AwareDateTime> {
        match self {
            Self::Aware(dt) => Some(*dt),
            Self::Naive(_) => None,
        }
    }

    /// Returns the aware value or `TimezoneMissing` naming `field`.
    pub fn require_aware(self, field: &'static str) -> DomainResult<AwareDateTime> {
        self.aware().ok_or_else(|| DomainError::timezone_missing(field))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(value: DateTime<Tz>) -> Self {
        let offset = value.offset().fix();
        Self::Aware(value.with_timezone(&offset))
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self::Naive(value)
    }
}

/// Convert a caller-supplied timestamp, rejecting zone-less values.
pub fn require_aware(
    ts: impl Into<Timestamp>,
    field: &'static str,
) -> DomainResult<AwareDateTime> {
    ts.into().require_aware(field)
}

/// Reject `later < earlier`. Equal instants are accepted.
pub fn ensure_not_before(
    earlier_field: &'static str,
    earlier: &AwareDateTime,
    later_field: &'static str,
    later: &AwareDateTime,
) -> DomainResult<()> {
    if later < earlier {
        return Err(DomainError::timestamp_order(earlier_field, later_field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};

    fn kst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn naive() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn naive_timestamp_is_rejected_with_field_name() {
        let err = require_aware(naive(), "now").unwrap_err();
        assert_eq!(err, DomainError::TimezoneMissing { field: "now" });
    }

    #[test]
    fn aware_timestamp_keeps_its_offset() {
        let t = kst().from_local_datetime(&naive()).unwrap();
        let aware = require_aware(t, "now").unwrap();
        assert_eq!(aware.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(aware, t);
    }

    #[test]
    fn utc_converts_to_zero_offset() {
        let t = Utc::now();
        let aware = require_aware(t, "now").unwrap();
        assert_eq!(aware.offset().local_minus_utc(), 0);
        assert_eq!(aware, t);
    }

    #[test]
    fn parse_distinguishes_aware_and_naive_text() {
        let aware = Timestamp::parse("2025-01-01T00:00:00+09:00").unwrap();
        assert!(aware.is_aware());

        let zulu = Timestamp::parse("2025-01-01T00:00:00Z").unwrap();
        assert!(zulu.is_aware());

        let zone_less = Timestamp::parse("2025-01-01T00:00:00").unwrap();
        assert_eq!(zone_less, Timestamp::Naive(naive()));

        let with_fraction = Timestamp::parse("2025-01-01 00:00:00.250").unwrap();
        assert!(!with_fraction.is_aware());
    }

    #[test]
    fn parse_rejects_garbage() {
        match Timestamp::parse("yesterday") {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("yesterday")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn ordering_accepts_equal_and_later() {
        let t0 = kst().from_local_datetime(&naive()).unwrap();
        let t1 = t0 + Duration::seconds(1);
        assert!(ensure_not_before("updated_at", &t0, "now", &t0).is_ok());
        assert!(ensure_not_before("updated_at", &t0, "now", &t1).is_ok());
        assert_eq!(
            ensure_not_before("updated_at", &t1, "now", &t0).unwrap_err(),
            DomainError::timestamp_order("updated_at", "now")
        );
    }

    #[test]
    fn ordering_compares_instants_across_offsets() {
        let seoul = kst().from_local_datetime(&naive()).unwrap();
        // 2024-12-31T15:00:00Z is the same instant as midnight in Seoul.
        let utc = seoul.with_timezone(&Utc);
        let utc = require_aware(utc, "now").unwrap();
        assert!(ensure_not_before("updated_at", &seoul, "now", &utc).is_ok());
    }
}
