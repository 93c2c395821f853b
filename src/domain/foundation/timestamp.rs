//! Timestamp value object for immutable points in time.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Immutable point in time, always UTC.
///
/// Backends store instants in their own representation (timestamptz,
/// epoch milliseconds); this is the comparable form the store works with.
/// Serializes as RFC 3339 with a `Z` suffix, the same text `to_rfc3339`
/// produces, so every timestamp in a response body has one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// Returns `None` if the value is outside the representable range.
    pub fn from_unix_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Returns the timestamp as Unix milliseconds.
    pub fn as_unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the current time, or `floor` if the clock reads earlier.
    ///
    /// Keeps `updated_at` monotonic when the wall clock steps backwards.
    pub fn now_not_before(floor: &Timestamp) -> Self {
        std::cmp::max(Self::now(), *floor)
    }

    /// Formats as RFC 3339.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_ordering_works() {
        let ts1 = Timestamp::now();
        sleep(Duration::from_millis(10));
        let ts2 = Timestamp::now();

        assert!(ts1 < ts2);
    }

    #[test]
    fn timestamp_unix_millis_roundtrips() {
        let ts = Timestamp::from_unix_millis(1_705_276_800_123).unwrap();
        assert_eq!(ts.as_unix_millis(), 1_705_276_800_123);
        assert_eq!(ts.as_datetime().year(), 2024);
    }

    #[test]
    fn now_not_before_respects_future_floor() {
        let floor = Timestamp::from_datetime(Utc::now() + chrono::Duration::hours(1));
        assert_eq!(Timestamp::now_not_before(&floor), floor);
    }

    #[test]
    fn now_not_before_uses_clock_when_ahead() {
        let floor = Timestamp::from_unix_millis(0).unwrap();
        assert!(Timestamp::now_not_before(&floor) > floor);
    }

    #[test]
    fn serialized_form_matches_rfc3339_text() {
        let ts = Timestamp::from_unix_millis(1_705_314_600_250).unwrap();

        assert_eq!(ts.to_rfc3339(), "2024-01-15T10:30:00.250Z");
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2024-01-15T10:30:00.250Z\"");
    }

    #[test]
    fn serialized_form_round_trips() {
        let ts = Timestamp::now();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(serde_json::from_str::<Timestamp>(&json).unwrap(), ts);
    }

    #[test]
    fn timestamp_deserializes_from_iso_string() {
        let json = "\"2024-01-15T10:30:00Z\"";
        let ts: Timestamp = serde_json::from_str(json).unwrap();
        assert_eq!(ts.as_datetime().year(), 2024);
    }
}
