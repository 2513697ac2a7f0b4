//! TicToc - client-visible latency instrumentation for reactive UIs
//!
//! This library correlates asynchronous start/end lifecycle signals into
//! timed measurements, with summary statistics, report filtering, and
//! CSV / JSON / self-contained HTML timeline exports.

pub mod adapter;
pub mod chart;
pub mod cli;
pub mod clock;
pub mod csv_output;
pub mod download;
pub mod filter;
pub mod html_output;
pub mod json_output;
pub mod label;
pub mod lifecycle;
pub mod marker;
pub mod recorder;
pub mod replay;
pub mod scheduler;
pub mod stats;
