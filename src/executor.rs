use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::ExecutionError;
pub use crate::settings::executable_path;

/// Runs one benchmark executable to completion and hands back what it printed on stdout.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, program: &Path, args: &[String]) -> Result<String, ExecutionError>;
}

/// Launches the executable as a child process. The call returns only after the child has
/// exited, so trials never overlap.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

#[async_trait]
impl Executor for ProcessExecutor {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn execute(&self, program: &Path, args: &[String]) -> Result<String, ExecutionError> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ExecutionError::Launch { program: program.to_path_buf(), source })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(?program, status=%output.status, %stderr, "benchmark executable failed");
            return Err(ExecutionError::Status {
                program: program.to_path_buf(),
                status: output.status,
                stderr,
            });
        }

        String::from_utf8(output.stdout).map_err(|source| ExecutionError::Encoding {
            program: program.to_path_buf(),
            source,
        })
    }
}
