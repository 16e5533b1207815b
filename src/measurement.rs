use std::collections::BTreeMap;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::MeasurementError;

/// One `label,milliseconds` line reported by a benchmark executable.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub benchmark: String,
    pub millis: f64,
}

/// Parse the stdout of one benchmark run. Blank lines are skipped; every other line must hold
/// exactly a benchmark label and a finite millisecond value.
pub fn parse_measurements(output: &str) -> Result<Vec<Measurement>, MeasurementError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(output.as_bytes());

    let mut measurements = vec![];
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.iter().all(str::is_empty) {
            continue;
        }

        if record.len() != 2 {
            return Err(MeasurementError::FieldCount { line, found: record.len() });
        }

        let value = &record[1];
        let millis = value
            .parse::<f64>()
            .ok()
            .filter(|ms| ms.is_finite())
            .ok_or_else(|| MeasurementError::Value { line, value: value.to_string() })?;

        measurements.push(Measurement { benchmark: record[0].to_string(), millis });
    }

    Ok(measurements)
}

/// Keeps the fastest time seen for each benchmark across the trials of one executable.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BestOfTrials {
    best: BTreeMap<String, f64>,
    trials: usize,
}

impl BestOfTrials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, measurement: Measurement) {
        self.best
            .entry(measurement.benchmark)
            .and_modify(|ms| *ms = ms.min(measurement.millis))
            .or_insert(measurement.millis);
    }

    pub fn merge_trial(&mut self, measurements: impl IntoIterator<Item = Measurement>) {
        for m in measurements {
            self.record(m);
        }
        self.trials += 1;
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn get(&self, benchmark: &str) -> Option<f64> {
        self.best.get(benchmark).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.best.iter().map(|(b, ms)| (b.as_str(), *ms))
    }

    pub fn into_best(self) -> BTreeMap<String, f64> {
        self.best
    }
}
