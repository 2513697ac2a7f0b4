use std::fs;
use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result};
use clap::Parser;
use tictoc::chart::{ChartSource, HttpChartSource, StaticChartSource};
use tictoc::cli::{Cli, OutputFormat};
use tictoc::csv_output;
use tictoc::download::DirectorySink;
use tictoc::filter::MeasurementFilter;
use tictoc::html_output;
use tictoc::json_output;
use tictoc::marker::Measurement;
use tictoc::replay;
use tictoc::stats::{self, MeasurementTable};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Open the event log for reading (- selects stdin)
fn open_event_log(path: &str) -> Result<Box<dyn BufRead>> {
    if path == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        let file = fs::File::open(path)
            .with_context(|| format!("failed to open event log {}", path))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Resolve where HTML exports take their chart bundle from
fn chart_source(args: &Cli) -> Result<Box<dyn ChartSource>> {
    if let Some(path) = &args.chart_bundle {
        let bundle = fs::read_to_string(path)
            .with_context(|| format!("failed to read chart bundle {}", path.display()))?;
        return Ok(Box::new(StaticChartSource::new(bundle)));
    }
    let source = match &args.chart_url {
        Some(url) => HttpChartSource::new(url.clone()),
        None => HttpChartSource::default_cdn(),
    };
    Ok(Box::new(source))
}

/// Print the measurement listing in the selected format
fn print_listing(measurements: &[Measurement], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print!("{}", MeasurementTable::collect(measurements).render_text());
        }
        OutputFormat::Json => {
            println!("{}", json_output::to_json_pretty(measurements)?);
        }
        OutputFormat::Csv => {
            print!(
                "{}",
                csv_output::to_csv(&MeasurementTable::collect(measurements))
            );
        }
    }
    Ok(())
}

/// Write the requested export artifacts into the output directory
fn run_exports(args: &Cli, measurements: &[Measurement]) -> Result<()> {
    let mut sink = DirectorySink::new(&args.output_dir);

    if args.export_csv {
        let table = MeasurementTable::collect(measurements);
        let filename = csv_output::export_csv(&table, &mut sink)?;
        eprintln!(
            "CSV export written to {}",
            sink.path_for(&filename).display()
        );
    }

    if args.export_html {
        let chart = chart_source(args)?;
        let filename = html_output::export_html(measurements, chart.as_ref(), &mut sink)?;
        eprintln!(
            "Timeline report written to {}",
            sink.path_for(&filename).display()
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let filter = match &args.filter {
        Some(expr) => MeasurementFilter::from_expr(expr)?,
        None => MeasurementFilter::all(),
    };

    let reader = open_event_log(&args.event_log)?;
    let recorder = replay::replay(reader)
        .with_context(|| format!("failed to replay event log {}", args.event_log))?;

    let measurements: Vec<Measurement> = recorder
        .measurements()
        .filter(|m| filter.matches(&m.name))
        .cloned()
        .collect();

    if args.summary {
        print!("{}", stats::summarize(&measurements).render_text());
    } else {
        print_listing(&measurements, args.format)?;
    }

    run_exports(&args, &measurements)?;

    Ok(())
}
