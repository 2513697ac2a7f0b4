//! Measurement filtering for -e ids= expressions
//!
//! Supports:
//! - Individual logical ids: -e ids=out1,out2,update_plot
//! - The server round-trip: -e ids=server
//! - Every output measurement: -e ids=outputs

use anyhow::{bail, Result};
use std::collections::HashSet;

use crate::label::{measurement_label, SERVER_COMPUTATION_ID};

/// Filter that decides which measurements appear in reports and exports.
#[derive(Debug, Clone)]
pub struct MeasurementFilter {
    /// Measurement names to include (None = all measurements).
    include: Option<HashSet<String>>,
    /// True when the `outputs` class was named (any non-server measurement).
    include_outputs: bool,
}

impl MeasurementFilter {
    /// Create a filter that includes every measurement.
    pub fn all() -> Self {
        Self {
            include: None,
            include_outputs: false,
        }
    }

    /// Parse a filter expression like "ids=out1,out2" or "ids=server".
    pub fn from_expr(expr: &str) -> Result<Self> {
        if let Some(id_spec) = expr.strip_prefix("ids=") {
            Ok(Self::from_id_spec(id_spec))
        } else {
            bail!(
                "Invalid filter expression: {}. Expected format: ids=SPEC",
                expr
            );
        }
    }

    /// Parse an id specification (the part after "ids=").
    ///
    /// Parts are logical ids, not measurement names; each id is expanded to
    /// its measurement label before matching.
    fn from_id_spec(spec: &str) -> Self {
        let mut names = HashSet::new();
        let mut include_outputs = false;

        for part in spec.split(',') {
            let part = part.trim();

            match part {
                "server" => {
                    names.insert(measurement_label(SERVER_COMPUTATION_ID));
                }
                "outputs" => {
                    include_outputs = true;
                }
                _ => {
                    names.insert(measurement_label(part));
                }
            }
        }

        Self {
            include: Some(names),
            include_outputs,
        }
    }

    /// Check if a measurement (by name) passes the filter.
    pub fn matches(&self, measurement_name: &str) -> bool {
        match &self.include {
            None => true, // No filter = include all
            Some(names) => {
                if names.contains(measurement_name) {
                    return true;
                }
                include_outputs_matches(self.include_outputs, measurement_name)
            }
        }
    }
}

/// The `outputs` class matches every measurement except the server's.
fn include_outputs_matches(include_outputs: bool, measurement_name: &str) -> bool {
    include_outputs && measurement_name != measurement_label(SERVER_COMPUTATION_ID)
}
