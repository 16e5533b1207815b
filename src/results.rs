use std::collections::BTreeMap;

use crate::error::ResultsError;
use crate::measurement::BestOfTrials;
use crate::settings::{BenchmarkKind, SuiteSetting};

/// Best times of one benchmark, per container, with one slot per case of the suite.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResults {
    pub name: String,
    pub series: BTreeMap<String, Vec<Option<f64>>>,
}

impl BenchmarkResults {
    pub fn times(&self, container: &str) -> Option<&[Option<f64>]> {
        self.series.get(container).map(|s| s.as_slice())
    }
}

/// Everything measured for one (kind, element bits) suite.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteResults {
    pub kind: BenchmarkKind,
    pub element_bits: u32,
    pub labels: Vec<String>,
    pub containers: Vec<String>,
    pub benchmarks: BTreeMap<String, BenchmarkResults>,
}

impl SuiteResults {
    pub fn new(suite: &SuiteSetting, containers: &[String]) -> Self {
        Self {
            kind: suite.kind,
            element_bits: suite.element_bits,
            labels: suite.labels(),
            containers: containers.to_vec(),
            benchmarks: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> String {
        format!("{}_{}", self.kind, self.element_bits)
    }

    /// Place the best-of-trials times of `container` for case `case_index`.
    pub fn record(&mut self, case_index: usize, container: &str, best: &BestOfTrials) -> Result<(), ResultsError> {
        let nr_cases = self.labels.len();
        if nr_cases <= case_index {
            return Err(ResultsError::CaseOutOfRange { index: case_index, cases: nr_cases });
        }

        if !self.containers.iter().any(|c| c == container) {
            return Err(ResultsError::UnknownContainer(container.to_string()));
        }

        for (benchmark, millis) in best.iter() {
            let results = self
                .benchmarks
                .entry(benchmark.to_string())
                .or_insert_with(|| BenchmarkResults { name: benchmark.to_string(), series: BTreeMap::new() });

            let slots = results
                .series
                .entry(container.to_string())
                .or_insert_with(|| vec![None; nr_cases]);
            slots[case_index] = Some(millis);
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Measurement;
    use crate::settings::CaseSetting;
    use claim::{assert_err, assert_matches, assert_ok, assert_some};
    use pretty_assertions::assert_eq;

    fn suite() -> SuiteSetting {
        SuiteSetting {
            kind: BenchmarkKind::Single,
            element_bits: 8,
            cases: ["256", "7936", "246016"]
                .iter()
                .map(|l| CaseSetting { label: l.to_string(), args: vec![] })
                .collect(),
        }
    }

    fn best(entries: &[(&str, f64)]) -> BestOfTrials {
        let mut best = BestOfTrials::new();
        best.merge_trial(
            entries
                .iter()
                .map(|(b, ms)| Measurement { benchmark: b.to_string(), millis: *ms }),
        );
        best
    }

    #[test]
    fn test_record_places_values_in_case_slots() {
        let containers = vec!["deque".to_string(), "vector".to_string()];
        let mut results = SuiteResults::new(&suite(), &containers);
        assert!(results.is_empty());
        assert_eq!(results.key(), "single_8");

        assert_ok!(results.record(0, "deque", &best(&[("Insert values", 1.0), ("Erase values", 2.0)])));
        assert_ok!(results.record(2, "deque", &best(&[("Insert values", 30.0)])));
        assert_ok!(results.record(1, "vector", &best(&[("Insert values", 5.0)])));

        let insert = assert_some!(results.benchmarks.get("Insert values"));
        assert_eq!(insert.times("deque"), Some(&[Some(1.0), None, Some(30.0)][..]));
        assert_eq!(insert.times("vector"), Some(&[None, Some(5.0), None][..]));

        let erase = assert_some!(results.benchmarks.get("Erase values"));
        assert_eq!(erase.times("deque"), Some(&[Some(2.0), None, None][..]));
        assert_eq!(erase.times("vector"), None);
    }

    #[test]
    fn test_record_rejects_unknown_slots() {
        let containers = vec!["deque".to_string()];
        let mut results = SuiteResults::new(&suite(), &containers);

        let actual = assert_err!(results.record(3, "deque", &best(&[("Insert values", 1.0)])));
        assert_matches!(actual, ResultsError::CaseOutOfRange { index: 3, cases: 3 });

        let actual = assert_err!(results.record(0, "vector", &best(&[("Insert values", 1.0)])));
        assert_matches!(actual, ResultsError::UnknownContainer(_));
        assert!(results.is_empty());
    }
}
