pub use chart::{jet, BarChart, ChartRenderer, LogAxis, Series};

mod chart;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;

use crate::error::ReportError;
use crate::results::{BenchmarkResults, SuiteResults};
use crate::settings::BenchmarkKind;

/// File name shared by the chart and raw artifacts of one benchmark, without extension:
/// `{name lowercased, spaces as underscores}-{kind}-{bits}`.
pub fn artifact_stem(name: &str, kind: BenchmarkKind, element_bits: u32) -> String {
    format!("{}-{}-{}", name.to_lowercase().replace(' ', "_"), kind, element_bits)
}

/// Milliseconds in shortest round-trip form, always with a fractional part (`3.0`, `12.5`).
/// Very small or large values use a signed exponent of at least two digits (`1e-05`, `1.5e+16`).
pub fn format_millis(millis: f64) -> String {
    let repr = format!("{:?}", millis);
    match repr.split_once('e') {
        None => repr,
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => format!("{}e{}{:02}", mantissa, if exp < 0 { '-' } else { '+' }, exp.abs()),
            Err(_) => repr,
        },
    }
}

/// Writes the raw table of one benchmark: a `#container,{labels..}` header followed by a row of
/// times per container. Cases without a time are left as empty fields.
pub fn write_raw<W: Write>(writer: W, suite: &SuiteResults, benchmark: &BenchmarkResults) -> Result<(), ReportError> {
    let mut csv = WriterBuilder::new().has_headers(false).flexible(true).from_writer(writer);

    let header = std::iter::once("#container".to_string()).chain(suite.labels.iter().cloned());
    csv.write_record(header)?;

    for container in suite.containers.iter() {
        let times = benchmark.times(container);
        let row = std::iter::once(container.clone()).chain((0..suite.labels.len()).map(|i| {
            times
                .and_then(|t| t.get(i).copied().flatten())
                .map(format_millis)
                .unwrap_or_default()
        }));
        csv.write_record(row)?;
    }

    csv.flush()?;
    Ok(())
}

/// Chart and raw text written for one benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub benchmark: String,
    pub chart: PathBuf,
    pub raw: PathBuf,
}

/// Writes both artifacts of every benchmark in `suite` under `output_dir`, creating the directory
/// if needed.
#[tracing::instrument(level = "info", skip(renderer, suite), fields(suite=%suite.key()))]
pub fn write_reports(
    output_dir: &Path, renderer: &ChartRenderer, suite: &SuiteResults,
) -> Result<Vec<Artifacts>, ReportError> {
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(suite.benchmarks.len());
    for benchmark in suite.benchmarks.values() {
        let stem = artifact_stem(&benchmark.name, suite.kind, suite.element_bits);

        let chart_path = output_dir.join(format!("{}.svg", stem));
        let svg = renderer.render(&BarChart::for_benchmark(suite, benchmark))?;
        fs::write(&chart_path, svg)?;

        let raw_path = output_dir.join(format!("{}.txt", stem));
        write_raw(fs::File::create(&raw_path)?, suite, benchmark)?;

        tracing::debug!(benchmark=%benchmark.name, chart=?chart_path, raw=?raw_path, "wrote benchmark report");
        written.push(Artifacts {
            benchmark: benchmark.name.clone(),
            chart: chart_path,
            raw: raw_path,
        });
    }

    Ok(written)
}
