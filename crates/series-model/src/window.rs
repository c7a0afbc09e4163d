//! Inclusive time windows and operator timestamp parsing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::datapoint::TimestampSecs;

/// Textual timestamp format accepted from the operator, always read as UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Example of [`TIMESTAMP_FORMAT`] shown in error messages.
pub const TIMESTAMP_EXAMPLE: &str = "2024-09-24T18:00:00";

/// Inclusive `[min_secs, max_secs]` filter applied while routing points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub min_secs: TimestampSecs,
    pub max_secs: TimestampSecs,
}

impl TimeWindow {
    /// Lower bound of an unrestricted window.
    pub const OPEN_MIN: TimestampSecs = 0;

    /// Upper bound of an unrestricted window.
    pub const OPEN_MAX: TimestampSecs = TimestampSecs::MAX;

    pub fn new(min_secs: TimestampSecs, max_secs: TimestampSecs) -> Self {
        Self { min_secs, max_secs }
    }

    /// The window every session starts with and `reset range` restores.
    pub fn unbounded() -> Self {
        Self::new(Self::OPEN_MIN, Self::OPEN_MAX)
    }

    /// Whether `t` lies inside the window. Both ends are inclusive.
    pub fn contains(&self, t: TimestampSecs) -> bool {
        self.min_secs <= t && t <= self.max_secs
    }

    pub fn is_unbounded(&self) -> bool {
        *self == Self::unbounded()
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min_secs, self.max_secs)
    }
}

/// Parse `YYYY-MM-DDTHH:MM:SS` as a UTC instant, returning Unix seconds.
pub fn parse_utc_timestamp(input: &str) -> Result<TimestampSecs, chrono::ParseError> {
    let naive = NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT)?;
    Ok(naive.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_window_is_open() {
        let window = TimeWindow::default();
        assert_eq!(window.min_secs, 0);
        assert_eq!(window.max_secs, i64::MAX);
        assert!(window.is_unbounded());
        assert!(window.contains(0));
        assert!(window.contains(i64::MAX));
        assert!(!window.contains(-1));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let window = TimeWindow::new(100, 150);
        assert!(window.contains(100));
        assert!(window.contains(150));
        assert!(!window.contains(99));
        assert!(!window.contains(151));
    }

    #[test]
    fn test_inverted_window_contains_nothing() {
        let window = TimeWindow::new(200, 100);
        assert!(!window.contains(150));
        assert!(!window.contains(100));
        assert!(!window.contains(200));
    }

    #[test]
    fn test_parse_utc_timestamp() {
        assert_eq!(
            parse_utc_timestamp("2024-09-24T18:00:00").unwrap(),
            1_727_200_800
        );
        assert_eq!(parse_utc_timestamp("1970-01-01T00:01:40").unwrap(), 100);
    }

    #[test]
    fn test_parse_rejects_other_layouts() {
        assert!(parse_utc_timestamp("2024-09-24 18:00:00").is_err());
        assert!(parse_utc_timestamp("2024-09-24T18:00").is_err());
        assert!(parse_utc_timestamp("2024-09-24T18:00:00Z").is_err());
        assert!(parse_utc_timestamp("2024-13-01T00:00:00").is_err());
        assert!(parse_utc_timestamp("").is_err());
    }

    proptest! {
        #[test]
        fn prop_contains_matches_inclusive_bounds(
            min in -1_000_000i64..1_000_000,
            max in -1_000_000i64..1_000_000,
            t in -2_000_000i64..2_000_000,
        ) {
            let window = TimeWindow::new(min, max);
            prop_assert_eq!(window.contains(t), min <= t && t <= max);
        }
    }
}
