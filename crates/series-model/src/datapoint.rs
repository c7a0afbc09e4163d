//! Decoded telemetry records.

use serde::{Deserialize, Serialize};

/// Unix timestamp in whole seconds (UTC).
pub type TimestampSecs = i64;

/// A single named metric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Metric name, e.g. `"rdk.cpu_user"`.
    pub metric: String,

    /// Sampled value.
    pub value: f32,
}

/// One decoded record: every reading taken at a single instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    /// Time all readings were taken.
    #[serde(rename = "t")]
    pub time_secs: TimestampSecs,

    /// Readings in decoder order.
    #[serde(default)]
    pub readings: Vec<Reading>,
}

impl Reading {
    pub fn new(metric: impl Into<String>, value: f32) -> Self {
        Self {
            metric: metric.into(),
            value,
        }
    }
}

impl Datapoint {
    pub fn new(time_secs: TimestampSecs, readings: Vec<Reading>) -> Self {
        Self {
            time_secs,
            readings,
        }
    }

    /// A datapoint carrying exactly one reading.
    pub fn single(time_secs: TimestampSecs, metric: impl Into<String>, value: f32) -> Self {
        Self::new(time_secs, vec![Reading::new(metric, value)])
    }

    /// Iterate readings as `(time, metric, value)` triples sharing this datapoint's timestamp.
    pub fn flatten(&self) -> impl Iterator<Item = (TimestampSecs, &str, f32)> + '_ {
        self.readings
            .iter()
            .map(move |r| (self.time_secs, r.metric.as_str(), r.value))
    }
}
