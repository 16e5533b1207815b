pub mod error;
pub mod executor;
pub mod harness;
pub mod measurement;
pub mod report;
pub mod results;
pub mod serde;
pub mod settings;
pub mod tracing;

pub use error::HarnessError;
pub use executor::{Executor, ProcessExecutor};
pub use harness::{Harness, RunSummary};
pub use settings::Settings;

pub type HarnessResult<T> = Result<T, error::HarnessError>;
