//! JSON output format for measurements
//!
//! One wire shape serves both consumers: the `--format json` listing and
//! the data element embedded in the HTML timeline report. Keys are
//! camelCase because the report's renderer consumes them in the browser.

use serde::{Deserialize, Serialize};

use crate::marker::Measurement;

/// JSON record for a single resolved measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonMeasurement {
    /// Measurement name, e.g. `out1_measurement`.
    pub name: String,
    /// Start timestamp in milliseconds since the time origin.
    #[serde(rename = "startTime")]
    pub start_time: f64,
    /// Duration in milliseconds.
    pub duration: f64,
}

impl From<&Measurement> for JsonMeasurement {
    fn from(measurement: &Measurement) -> Self {
        Self {
            name: measurement.name.clone(),
            start_time: measurement.start_time,
            duration: measurement.duration,
        }
    }
}

/// Project measurements into their JSON records, preserving order.
pub fn to_records<'a, I>(measurements: I) -> Vec<JsonMeasurement>
where
    I: IntoIterator<Item = &'a Measurement>,
{
    measurements.into_iter().map(JsonMeasurement::from).collect()
}

/// Serialize measurements as a compact JSON array.
pub fn to_json<'a, I>(measurements: I) -> serde_json::Result<String>
where
    I: IntoIterator<Item = &'a Measurement>,
{
    serde_json::to_string(&to_records(measurements))
}

/// Serialize measurements as a pretty-printed JSON array.
pub fn to_json_pretty<'a, I>(measurements: I) -> serde_json::Result<String>
where
    I: IntoIterator<Item = &'a Measurement>,
{
    serde_json::to_string_pretty(&to_records(measurements))
}
