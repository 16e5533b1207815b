use std::path::{Path, PathBuf};

use crate::executor::Executor;
use crate::measurement::{parse_measurements, BestOfTrials};
use crate::report::{write_reports, Artifacts, ChartRenderer};
use crate::results::SuiteResults;
use crate::settings::{Settings, SuiteSetting};
use crate::{HarnessError, HarnessResult};

/// Results and artifacts of one suite.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteOutcome {
    pub results: SuiteResults,
    pub artifacts: Vec<Artifacts>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSummary {
    pub suites: Vec<SuiteOutcome>,
}

impl RunSummary {
    pub fn artifact_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.suites
            .iter()
            .flat_map(|s| s.artifacts.iter())
            .flat_map(|a| [&a.chart, &a.raw])
    }

    pub fn nr_benchmarks(&self) -> usize {
        self.suites.iter().map(|s| s.results.benchmarks.len()).sum()
    }
}

/// Drives every configured suite: runs each executable `trials` times per case, keeps the fastest
/// time per benchmark, then writes the charts and raw tables.
///
/// Executions are strictly sequential and the first failure aborts the run.
#[derive(Debug)]
pub struct Harness<E> {
    settings: Settings,
    executor: E,
    renderer: ChartRenderer,
}

impl<E: Executor> Harness<E> {
    pub fn new(settings: Settings, executor: E) -> HarnessResult<Self> {
        let renderer = ChartRenderer::new()?;
        Ok(Self { settings, executor, renderer })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[tracing::instrument(level = "info", skip(self))]
    pub async fn run(&self) -> HarnessResult<RunSummary> {
        let mut summary = RunSummary::default();

        for suite in self.settings.suites.iter() {
            let results = self.run_suite(suite).await?;
            let artifacts = write_reports(&self.settings.output_dir, &self.renderer, &results)?;
            tracing::info!(suite=%results.key(), benchmarks=%results.benchmarks.len(), "suite reported");
            summary.suites.push(SuiteOutcome { results, artifacts });
        }

        Ok(summary)
    }

    #[tracing::instrument(level = "info", skip(self, suite), fields(suite=%suite.key()))]
    pub async fn run_suite(&self, suite: &SuiteSetting) -> HarnessResult<SuiteResults> {
        let mut results = SuiteResults::new(suite, &self.settings.containers);

        for (case_index, case) in suite.cases.iter().enumerate() {
            for container in self.settings.containers.iter() {
                let program = suite.executable(&self.settings.bin_dir, container);
                let best = self.best_of_trials(&program, &case.label, &case.args).await?;
                tracing::info!(
                    case=%case.label, %container, benchmarks=%best.iter().count(),
                    "best of {} trials", best.trials()
                );
                results.record(case_index, container, &best)?;
            }
        }

        Ok(results)
    }

    #[tracing::instrument(level = "debug", skip(self, args))]
    async fn best_of_trials(&self, program: &Path, case: &str, args: &[String]) -> HarnessResult<BestOfTrials> {
        let mut best = BestOfTrials::new();

        for trial in 1..=self.settings.trials {
            let measurements = self
                .executor
                .execute(program, args)
                .await
                .map_err(HarnessError::from)
                .and_then(|output| parse_measurements(&output).map_err(HarnessError::from))
                .map_err(|err| err.in_trial(program, case, trial))?;

            tracing::debug!(%trial, measurements=%measurements.len(), "trial complete");
            best.merge_trial(measurements);
        }

        Ok(best)
    }
}
