use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("{0}")]
    SettingsError(#[from] SettingsError),

    #[error("{0}")]
    ExecutionError(#[from] ExecutionError),

    #[error("{0}")]
    MeasurementError(#[from] MeasurementError),

    #[error("{0}")]
    ResultsError(#[from] ResultsError),

    #[error("{0}")]
    ReportError(#[from] ReportError),

    /// A failure while running one trial, annotated with where in the run it happened.
    #[error("trial {trial} of case {case} failed for {}: {source}", .program.display())]
    TrialFailed {
        program: PathBuf,
        case: String,
        trial: usize,
        #[source]
        source: Box<HarnessError>,
    },
}

/// Set of errors occurring while launching a benchmark executable.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to launch benchmark executable {}: {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("benchmark executable {} exited with {status}: {stderr}", .program.display())]
    Status {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("benchmark executable {} produced non UTF-8 output", .program.display())]
    Encoding {
        program: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Set of errors occurring while parsing the `label,milliseconds` lines a benchmark prints.
#[derive(Debug, Error)]
pub enum MeasurementError {
    #[error("{0}")]
    CsvError(#[from] csv::Error),

    #[error("malformed measurement on line {line}: expected 2 fields but found {found}")]
    FieldCount { line: u64, found: usize },

    #[error("malformed measurement on line {line}: {value:?} is not a finite number of milliseconds")]
    Value { line: u64, value: String },
}

#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("container {0} is not part of this suite")]
    UnknownContainer(String),

    #[error("case index {index} is out of range for a suite with {cases} cases")]
    CaseOutOfRange { index: usize, cases: usize },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0}")]
    IOError(#[from] std::io::Error),

    #[error("{0}")]
    CsvError(#[from] csv::Error),

    #[error("{0}")]
    TemplateError(#[from] handlebars::TemplateError),

    #[error("{0}")]
    RenderError(#[from] handlebars::RenderError),
}

/// Error variants related to configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// Error in configuration settings.
    #[error(transparent)]
    Configuration(#[from] config::ConfigError),

    /// Error in bootstrapping execution from configuration.
    #[error("error during system bootstrap: {message}: {setting}")]
    Bootstrap { message: String, setting: String },
}

impl HarnessError {
    pub fn in_trial(self, program: impl Into<PathBuf>, case: impl Into<String>, trial: usize) -> Self {
        HarnessError::TrialFailed {
            program: program.into(),
            case: case.into(),
            trial,
            source: Box::new(self),
        }
    }
}
