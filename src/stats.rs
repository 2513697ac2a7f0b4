//! Measurement aggregation and table projection
//!
//! Two read-side views over resolved measurements: a summary of the slowest
//! server round-trip and slowest output recomputation, and a row-per-
//! measurement table that feeds the text listing and the CSV export.

use crate::label::{measurement_label, SERVER_COMPUTATION_ID};
use crate::marker::Measurement;

/// Canonical column names of the measurement table.
pub const TABLE_HEADER: [&str; 3] = ["measurement_id", "duration (ms)", "start_time"];

/// The slowest output recomputation, with the measurement that set it.
#[derive(Debug, Clone, PartialEq)]
pub struct SlowestOutput {
    /// Measurement name, e.g. `histogram_measurement`.
    pub name: String,
    /// Duration in milliseconds.
    pub duration: f64,
}

/// Worst-case latencies split into server and output partitions.
///
/// Empty partitions are `None`; a session with no server round-trips never
/// reports a sentinel duration for one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    /// Max duration among server round-trip measurements.
    pub slowest_server: Option<f64>,
    /// Max duration among output measurements, with its name.
    pub slowest_output: Option<SlowestOutput>,
}

impl Summary {
    /// Render the two-line human-readable summary.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        match self.slowest_server {
            Some(duration) => {
                out.push_str(&format!(
                    "Slowest server computation: {:.3} ms\n",
                    duration
                ));
            }
            None => out.push_str("Slowest server computation: (none recorded)\n"),
        }
        match &self.slowest_output {
            Some(slowest) => {
                out.push_str(&format!(
                    "Slowest output computation: {:.3} ms ({})\n",
                    slowest.duration, slowest.name
                ));
            }
            None => out.push_str("Slowest output computation: (none recorded)\n"),
        }
        out
    }
}

/// Partition measurements by the server sentinel and take each partition's
/// maximum duration. Ties keep the earliest measurement.
pub fn summarize<'a, I>(measurements: I) -> Summary
where
    I: IntoIterator<Item = &'a Measurement>,
{
    let server_name = measurement_label(SERVER_COMPUTATION_ID);
    let mut summary = Summary::default();

    for measurement in measurements {
        if measurement.name == server_name {
            let current = summary.slowest_server.unwrap_or(f64::NEG_INFINITY);
            if measurement.duration > current {
                summary.slowest_server = Some(measurement.duration);
            }
        } else {
            let current = summary
                .slowest_output
                .as_ref()
                .map_or(f64::NEG_INFINITY, |s| s.duration);
            if measurement.duration > current {
                summary.slowest_output = Some(SlowestOutput {
                    name: measurement.name.clone(),
                    duration: measurement.duration,
                });
            }
        }
    }

    summary
}

/// One row of the measurement table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Measurement name (the `measurement_id` column).
    pub name: String,
    /// Duration in milliseconds.
    pub duration: f64,
    /// Start timestamp in milliseconds since the time origin.
    pub start_time: f64,
}

/// Measurements projected into the canonical table shape, in log order.
#[derive(Debug, Clone, Default)]
pub struct MeasurementTable {
    rows: Vec<TableRow>,
}

impl MeasurementTable {
    /// Build a table from measurements, preserving their order.
    pub fn collect<'a, I>(measurements: I) -> Self
    where
        I: IntoIterator<Item = &'a Measurement>,
    {
        let rows = measurements
            .into_iter()
            .map(|m| TableRow {
                name: m.name.clone(),
                duration: m.duration,
                start_time: m.start_time,
            })
            .collect();
        Self { rows }
    }

    /// The table's rows, in insertion order.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the aligned text listing.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{:<40} {:>13} {:>15}\n",
            TABLE_HEADER[0], TABLE_HEADER[1], TABLE_HEADER[2]
        ));
        out.push_str(&format!(
            "{} {} {}\n",
            "-".repeat(40),
            "-".repeat(13),
            "-".repeat(15)
        ));
        for row in &self.rows {
            out.push_str(&format!(
                "{:<40} {:>13.3} {:>15.3}\n",
                row.name, row.duration, row.start_time
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(name: &str, duration: f64, start_time: f64) -> Measurement {
        Measurement {
            name: name.to_string(),
            duration,
            start_time,
        }
    }

    #[test]
    fn test_summarize_splits_server_and_outputs() {
        let measurements = vec![
            measurement("out1_measurement", 43.0, 100.0),
            measurement("server_computation_measurement", 50.0, 10.0),
            measurement("out2_measurement", 90.0, 120.0),
            measurement("server_computation_measurement", 35.0, 200.0),
        ];

        let summary = summarize(&measurements);
        assert_eq!(summary.slowest_server, Some(50.0));
        let slowest = summary.slowest_output.unwrap();
        assert_eq!(slowest.name, "out2_measurement");
        assert_eq!(slowest.duration, 90.0);
    }

    #[test]
    fn test_summarize_empty_partitions_are_none() {
        let summary = summarize(&[]);
        assert_eq!(summary.slowest_server, None);
        assert_eq!(summary.slowest_output, None);
    }

    #[test]
    fn test_summarize_server_only_session() {
        let measurements = vec![measurement("server_computation_measurement", 12.0, 0.0)];
        let summary = summarize(&measurements);
        assert_eq!(summary.slowest_server, Some(12.0));
        assert_eq!(summary.slowest_output, None);
    }

    #[test]
    fn test_summarize_tie_keeps_earliest() {
        let measurements = vec![
            measurement("first_measurement", 30.0, 0.0),
            measurement("second_measurement", 30.0, 10.0),
        ];
        let summary = summarize(&measurements);
        assert_eq!(summary.slowest_output.unwrap().name, "first_measurement");
    }

    #[test]
    fn test_summarize_custom_operations_count_as_outputs() {
        let measurements = vec![measurement("update_plot_measurement", 7.5, 1.0)];
        let summary = summarize(&measurements);
        assert_eq!(summary.slowest_server, None);
        assert_eq!(summary.slowest_output.unwrap().name, "update_plot_measurement");
    }

    #[test]
    fn test_summary_render_text_with_values() {
        let summary = Summary {
            slowest_server: Some(50.0),
            slowest_output: Some(SlowestOutput {
                name: "out2_measurement".to_string(),
                duration: 90.0,
            }),
        };
        let text = summary.render_text();
        assert!(text.contains("Slowest server computation: 50.000 ms"));
        assert!(text.contains("Slowest output computation: 90.000 ms (out2_measurement)"));
    }

    #[test]
    fn test_summary_render_text_empty() {
        let text = Summary::default().render_text();
        assert!(text.contains("Slowest server computation: (none recorded)"));
        assert!(text.contains("Slowest output computation: (none recorded)"));
    }

    #[test]
    fn test_table_preserves_order() {
        let measurements = vec![
            measurement("b_measurement", 2.0, 1.0),
            measurement("a_measurement", 1.0, 5.0),
        ];
        let table = MeasurementTable::collect(&measurements);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].name, "b_measurement");
        assert_eq!(table.rows()[1].name, "a_measurement");
    }

    #[test]
    fn test_table_header_is_canonical() {
        assert_eq!(
            TABLE_HEADER,
            ["measurement_id", "duration (ms)", "start_time"]
        );
    }

    #[test]
    fn test_table_render_text_includes_header_and_rows() {
        let measurements = vec![measurement("out1_measurement", 43.0, 100.0)];
        let table = MeasurementTable::collect(&measurements);
        let text = table.render_text();
        assert!(text.contains("measurement_id"));
        assert!(text.contains("duration (ms)"));
        assert!(text.contains("out1_measurement"));
        assert!(text.contains("43.000"));
    }

    #[test]
    fn test_empty_table_renders_header_only() {
        let table = MeasurementTable::collect(&[]);
        assert!(table.is_empty());
        let text = table.render_text();
        assert!(text.contains("measurement_id"));
    }
}
