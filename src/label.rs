//! Marker label derivation
//!
//! Every logical measurement id owns three marker labels: one for the start
//! marker, one for the end marker, and one for the resolved measurement.
//! Labels are derived with a fixed `_`-joined scheme so that a measurement
//! found in the log can be traced back to the id that produced it.

/// Logical id used for server round-trip measurements.
///
/// Server busy/idle signals carry no id of their own, so they all correlate
/// under this sentinel.
pub const SERVER_COMPUTATION_ID: &str = "server_computation";

/// Suffix of start marker labels.
pub const START_SUFFIX: &str = "start";
/// Suffix of end marker labels.
pub const END_SUFFIX: &str = "end";
/// Suffix of measurement labels.
pub const MEASUREMENT_SUFFIX: &str = "measurement";

/// Derive a marker label from a logical id and a suffix.
///
/// The scheme is purely textual: an id that itself ends in `_start`,
/// `_end`, or `_measurement` can alias another id's labels. Ids are
/// host-chosen, so no validation is performed here.
pub fn derive_label(id: &str, suffix: &str) -> String {
    format!("{}_{}", id, suffix)
}

/// Label of the start marker for `id`.
pub fn start_label(id: &str) -> String {
    derive_label(id, START_SUFFIX)
}

/// Label of the end marker for `id`.
pub fn end_label(id: &str) -> String {
    derive_label(id, END_SUFFIX)
}

/// Label of the resolved measurement for `id`.
pub fn measurement_label(id: &str) -> String {
    derive_label(id, MEASUREMENT_SUFFIX)
}
