//! Artifact delivery for exports
//!
//! Exports are rendered in memory and handed to a [`DownloadSink`] together
//! with a MIME type and a timestamped filename. The sink is the host
//! boundary: the CLI writes files into a directory, tests capture the bytes,
//! and embedded hosts can hand them to whatever download mechanism they own.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::chart::ChartFetchError;

/// MIME type of CSV exports.
pub const CSV_MIME: &str = "text/csv;charset=utf-8";
/// MIME type of HTML timeline reports.
pub const HTML_MIME: &str = "text/html;charset=utf-8";

/// Failure while producing or delivering an export artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The chart bundle for an HTML report could not be acquired.
    #[error(transparent)]
    Chart(#[from] ChartFetchError),
    /// The timeline data element could not be serialized.
    #[error("failed to serialize timeline data")]
    Serialize(#[from] serde_json::Error),
    /// The sink refused the artifact.
    #[error("failed to deliver `{filename}`")]
    Deliver {
        filename: String,
        #[source]
        source: io::Error,
    },
}

/// Filename for an export taken at the current local wall-clock time,
/// e.g. `2026_08_22-14_03_59-tictoc.csv`.
///
/// Local time, zero-padded, so exports from one sitting sort together in a
/// directory listing.
pub fn timestamped_filename(extension: &str) -> String {
    format!(
        "{}-tictoc.{}",
        chrono::Local::now().format("%Y_%m_%d-%H_%M_%S"),
        extension
    )
}

/// Destination for rendered export artifacts.
pub trait DownloadSink {
    /// Hand over one complete artifact.
    fn deliver(&mut self, content: &[u8], mime_type: &str, filename: &str) -> io::Result<()>;
}

/// Sink that writes artifacts into a directory, creating it if needed.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create a sink rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the given filename would be written to.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, content: &[u8], _mime_type: &str, filename: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(filename), content)
    }
}

/// One artifact captured by a [`MemorySink`].
#[derive(Debug, Clone)]
pub struct Delivery {
    pub content: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

/// Sink that keeps delivered artifacts in memory.
///
/// Used by tests and by hosts that forward artifacts instead of writing
/// files.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub deliveries: Vec<Delivery>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&mut self, content: &[u8], mime_type: &str, filename: &str) -> io::Result<()> {
        self.deliveries.push(Delivery {
            content: content.to_vec(),
            mime_type: mime_type.to_string(),
            filename: filename.to_string(),
        });
        Ok(())
    }
}
