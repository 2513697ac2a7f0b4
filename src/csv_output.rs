//! CSV output format for measurement tables
//!
//! Emits the canonical three-column schema
//! `measurement_id,duration (ms),start_time`, one row per measurement in
//! log order. Fields are joined verbatim with no quoting: measurement ids
//! are host-chosen identifiers, not free text, so a comma in one is an id
//! hygiene bug upstream rather than something this writer papers over.

use crate::download::{timestamped_filename, DownloadSink, ExportError, CSV_MIME};
use crate::stats::{MeasurementTable, TABLE_HEADER};

/// Render a measurement table as CSV.
///
/// Durations and timestamps use the shortest round-trippable decimal form,
/// so `90.0` ms serializes as `90` and `5.25` ms as `5.25`.
pub fn to_csv(table: &MeasurementTable) -> String {
    let mut output = String::new();

    // Header
    output.push_str(&TABLE_HEADER.join(","));
    output.push('\n');

    // One row per measurement
    for row in table.rows() {
        output.push_str(&format!(
            "{},{},{}\n",
            row.name, row.duration, row.start_time
        ));
    }

    output
}

/// Render the table and deliver it under a timestamped `.csv` filename.
///
/// Returns the filename the sink received.
pub fn export_csv<S: DownloadSink>(
    table: &MeasurementTable,
    sink: &mut S,
) -> Result<String, ExportError> {
    let csv = to_csv(table);
    let filename = timestamped_filename("csv");
    sink.deliver(csv.as_bytes(), CSV_MIME, &filename)
        .map_err(|source| ExportError::Deliver {
            filename: filename.clone(),
            source,
        })?;
    Ok(filename)
}
