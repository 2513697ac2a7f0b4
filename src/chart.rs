//! Chart bundle acquisition for HTML reports
//!
//! The timeline report embeds a full snapshot of the charting library so the
//! exported file renders with no network access. Acquisition sits behind
//! [`ChartSource`] so the exporter can take the bundle from the CDN, from a
//! local file, or from a test fixture, and so a fetch failure aborts report
//! generation with an attributable error instead of producing a blank chart.

use thiserror::Error;

/// Pinned CDN snapshot of the charting library embedded by default.
pub const DEFAULT_CHART_BUNDLE_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Error raised when the chart bundle cannot be acquired.
#[derive(Debug, Error)]
pub enum ChartFetchError {
    /// The HTTP fetch failed (transport error or non-success status).
    #[error("failed to fetch chart bundle from `{url}`")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// A non-HTTP source could not produce the bundle.
    #[error("chart bundle unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Source of the charting library's JavaScript source text.
pub trait ChartSource {
    /// Produce the complete bundle text.
    fn fetch(&self) -> Result<String, ChartFetchError>;
}

/// Fetches the bundle over HTTP with a blocking request.
#[derive(Debug, Clone)]
pub struct HttpChartSource {
    url: String,
}

impl HttpChartSource {
    /// Fetch from a specific URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Fetch from the pinned default CDN snapshot.
    pub fn default_cdn() -> Self {
        Self::new(DEFAULT_CHART_BUNDLE_URL)
    }

    /// The URL this source fetches from.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpChartSource {
    fn default() -> Self {
        Self::default_cdn()
    }
}

impl ChartSource for HttpChartSource {
    fn fetch(&self) -> Result<String, ChartFetchError> {
        tracing::debug!(url = %self.url, "fetching chart bundle");
        reqwest::blocking::get(&self.url)
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(|response| response.text())
            .map_err(|source| ChartFetchError::Http {
                url: self.url.clone(),
                source,
            })
    }
}

/// Serves a bundle already held in memory (a vendored file, or a fixture).
#[derive(Debug, Clone)]
pub struct StaticChartSource {
    bundle: String,
}

impl StaticChartSource {
    /// Wrap an in-memory bundle.
    pub fn new(bundle: impl Into<String>) -> Self {
        Self {
            bundle: bundle.into(),
        }
    }
}

impl ChartSource for StaticChartSource {
    fn fetch(&self) -> Result<String, ChartFetchError> {
        Ok(self.bundle.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url_is_pinned() {
        let source = HttpChartSource::default_cdn();
        assert_eq!(source.url(), DEFAULT_CHART_BUNDLE_URL);
        assert!(source.url().starts_with("https://"));
    }

    #[test]
    fn test_static_source_returns_bundle() {
        let source = StaticChartSource::new("window.Plotly = {};");
        assert_eq!(source.fetch().unwrap(), "window.Plotly = {};");
    }

    #[test]
    fn test_unavailable_error_names_reason() {
        let err = ChartFetchError::Unavailable {
            reason: "no bundle file".to_string(),
        };
        assert!(err.to_string().contains("no bundle file"));
    }
}
