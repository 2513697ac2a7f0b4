//! Self-contained HTML timeline reports
//!
//! The report is a single file with no external references: the measurement
//! data rides in an inline JSON data element, the charting library is
//! embedded as a snapshot taken at export time, and the renderer script is
//! compiled into the binary. Opening the file from disk, offline, years
//! later still renders the timeline.

use crate::chart::ChartSource;
use crate::download::{timestamped_filename, DownloadSink, ExportError, HTML_MIME};
use crate::json_output;
use crate::marker::Measurement;

/// DOM id of the inline JSON data element.
pub const DATA_ELEMENT_ID: &str = "tictoc-data";
/// DOM id of the element the chart renders into.
pub const TIMELINE_ELEMENT_ID: &str = "tictoc-timeline";

/// Renderer script embedded into every report.
static TIMELINE_JS: &str = include_str!("timeline.js");

/// Escape a JSON string for inline `<script>` embedding.
///
/// `<` becomes `\u003c` (still valid JSON), which neutralizes `</script>`
/// sequences a measurement name could otherwise smuggle into the document.
fn escape_json_for_inline(json: &str) -> String {
    json.replace('<', "\\u003c")
}

/// Embedded CSS styles.
fn generate_styles() -> &'static str {
    r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1 {
            color: #333;
        }
        .meta {
            color: #888;
            font-size: 0.9em;
            margin-bottom: 12px;
        }
        #tictoc-timeline {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            min-height: 420px;
        }
        "#
}

/// Generate the complete report document.
///
/// An empty measurement set still produces a well-formed report with an
/// empty timeline. Report generation itself performs no fetches; the chart
/// bundle is passed in already acquired.
pub fn render_report<'a, I>(measurements: I, chart_bundle: &str) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Measurement>,
{
    let records = json_output::to_records(measurements);
    let data_json = escape_json_for_inline(&serde_json::to_string(&records)?);

    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html lang=\"en\">\n");

    html.push_str("<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <title>TicToc Timeline Report</title>\n");
    html.push_str("    <style>");
    html.push_str(generate_styles());
    html.push_str("</style>\n");
    html.push_str("</head>\n");

    html.push_str("<body>\n");
    html.push_str("    <h1>Measurement Timeline</h1>\n");
    html.push_str(&format!(
        "    <div class=\"meta\">{} measurement(s), times in ms since the session's time origin</div>\n",
        records.len()
    ));
    html.push_str(&format!(
        "    <div id=\"{}\"></div>\n",
        TIMELINE_ELEMENT_ID
    ));

    // Data element first, then the chart bundle, then the renderer.
    html.push_str(&format!(
        "    <script id=\"{}\" type=\"application/json\">{}</script>\n",
        DATA_ELEMENT_ID, data_json
    ));
    html.push_str("    <script>");
    html.push_str(chart_bundle);
    html.push_str("</script>\n");
    html.push_str("    <script>");
    html.push_str(TIMELINE_JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n");
    html.push_str("</html>\n");

    Ok(html)
}

/// Acquire the chart bundle, render the report, and deliver it under a
/// timestamped `.html` filename.
///
/// A bundle acquisition failure aborts the export: nothing reaches the
/// sink, because a report without its chart library would render nothing
/// once saved. Returns the filename the sink received.
pub fn export_html<'a, I, S>(
    measurements: I,
    chart: &dyn ChartSource,
    sink: &mut S,
) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Measurement>,
    S: DownloadSink,
{
    let bundle = chart.fetch()?;
    let html = render_report(measurements, &bundle)?;
    let filename = timestamped_filename("html");
    sink.deliver(html.as_bytes(), HTML_MIME, &filename)
        .map_err(|source| ExportError::Deliver {
            filename: filename.clone(),
            source,
        })?;
    Ok(filename)
}
