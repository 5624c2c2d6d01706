//! # UTC-Only Timestamps
//!
//! `Timestamp` enforces UTC with the Z suffix, truncated to seconds. A
//! timestamp participates in certificate-hash derivation, so two renderings
//! of the same instant must produce identical canonical bytes. Local
//! offsets and sub-second precision would both break that.
//!
//! Non-UTC inputs are rejected at construction on the strict path; there is
//! a lenient parser for ingesting wallet- or UI-supplied values, which
//! converts to UTC before the invariant applies.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TimestampError;

/// A UTC timestamp truncated to seconds precision.
///
/// Serializes as exactly `YYYY-MM-DDTHH:MM:SSZ`, which is also the form
/// canonicalization sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string, accepting only the `Z` suffix.
    ///
    /// Explicit offsets are rejected even when semantically UTC
    /// (`+00:00`), so every accepted input has exactly one rendering.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        if !s.ends_with('Z') {
            return Err(TimestampError::NonUtc(s.to_string()));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TimestampError::Invalid {
            input: s.to_string(),
            source: e,
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Parse an RFC 3339 string with any offset, converting to UTC.
    ///
    /// For ingesting external data only. Digest paths should use
    /// [`Timestamp::parse()`].
    pub fn parse_lenient(s: &str) -> Result<Self, TimestampError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TimestampError::Invalid {
            input: s.to_string(),
            source: e,
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// From a Unix epoch timestamp in seconds.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, TimestampError> {
        let dt = DateTime::from_timestamp(secs, 0).ok_or(TimestampError::OutOfRange(secs))?;
        Ok(Self(dt))
    }

    /// The Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Discard the nanosecond component.
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc
            .with_ymd_and_hms(2026, 6, 1, 9, 30, 45)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();
        let ts = Timestamp::from_utc(dt);
        assert_eq!(ts.to_iso8601(), "2026-06-01T09:30:45Z");
    }

    #[test]
    fn test_parse_z_accepted() {
        let ts = Timestamp::parse("2026-06-01T09:30:45Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-06-01T09:30:45Z");
    }

    #[test]
    fn test_parse_offsets_rejected() {
        assert!(Timestamp::parse("2026-06-01T09:30:45+00:00").is_err());
        assert!(Timestamp::parse("2026-06-01T14:30:45+05:00").is_err());
        assert!(Timestamp::parse("2026-06-01T05:30:45-04:00").is_err());
    }

    #[test]
    fn test_parse_subseconds_truncated() {
        let ts = Timestamp::parse("2026-06-01T09:30:45.999Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-06-01T09:30:45Z");
    }

    #[test]
    fn test_parse_invalid_rejected() {
        assert!(Timestamp::parse("not-a-date").is_err());
        assert!(Timestamp::parse("2026-06-01").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn test_parse_lenient_converts_offset() {
        let ts = Timestamp::parse_lenient("2026-06-01T14:30:45+05:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-06-01T09:30:45Z");
    }

    #[test]
    fn test_epoch_roundtrip() {
        let ts = Timestamp::parse("2026-06-01T09:30:45Z").unwrap();
        assert_eq!(Timestamp::from_epoch_secs(ts.epoch_secs()).unwrap(), ts);
    }

    #[test]
    fn test_serde_emits_z_form() {
        let ts = Timestamp::parse("2026-06-01T09:30:45Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2026-06-01T09:30:45Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_deserialize_rejects_offset_form() {
        let result: Result<Timestamp, _> =
            serde_json::from_str("\"2026-06-01T09:30:45+00:00\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_ordering() {
        let earlier = Timestamp::parse("2026-06-01T09:30:45Z").unwrap();
        let later = Timestamp::parse("2026-06-01T09:30:46Z").unwrap();
        assert!(earlier < later);
    }
}
