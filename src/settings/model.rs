use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::error::SettingsError;

/// Family of benchmark executables; selects the `bench_{kind}_...` program prefix.
#[derive(Debug, Display, EnumString, AsRefStr, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BenchmarkKind {
    Single,
    Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub bin_dir: PathBuf,
    pub output_dir: PathBuf,
    pub trials: usize,
    pub containers: Vec<String>,
    pub suites: Vec<SuiteSetting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSetting {
    #[serde(
        serialize_with = "crate::serde::serialize_to_str",
        deserialize_with = "crate::serde::deserialize_from_str"
    )]
    pub kind: BenchmarkKind,
    pub element_bits: u32,
    pub cases: Vec<CaseSetting>,
}

/// One data size to benchmark. `args` are handed to the executable verbatim; checksums exceed
/// the signed 64-bit range, so they stay text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSetting {
    pub label: String,
    pub args: Vec<String>,
}

impl SuiteSetting {
    /// Identifier used to select suites from the command line, e.g. `single_8`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.kind, self.element_bits)
    }

    pub fn labels(&self) -> Vec<String> {
        self.cases.iter().map(|c| c.label.clone()).collect()
    }

    /// Path of the executable benchmarking `container` for this suite.
    pub fn executable(&self, bin_dir: &Path, container: &str) -> PathBuf {
        executable_path(bin_dir, self.kind, container, self.element_bits)
    }
}

pub fn executable_path(bin_dir: &Path, kind: BenchmarkKind, container: &str, element_bits: u32) -> PathBuf {
    bin_dir.join(format!("bench_{}_{}_{}", kind, container, element_bits))
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.trials == 0 {
            return Err(bootstrap("trials must be at least 1", self.trials));
        }

        if self.containers.is_empty() {
            return Err(bootstrap("no containers configured", &self.containers));
        }

        let mut containers = HashSet::with_capacity(self.containers.len());
        for container in self.containers.iter() {
            if !containers.insert(container.as_str()) {
                return Err(bootstrap("duplicate container", container));
            }
        }

        for suite in self.suites.iter() {
            if suite.cases.is_empty() {
                return Err(bootstrap("suite has no cases", suite.key()));
            }

            let mut labels = HashSet::with_capacity(suite.cases.len());
            for case in suite.cases.iter() {
                if !labels.insert(case.label.as_str()) {
                    return Err(bootstrap(
                        "duplicate case label",
                        format!("{}:{}", suite.key(), case.label),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Keep only the suites whose key is listed. An empty selection keeps every suite.
    pub fn retain_suites(&mut self, selection: &[String]) -> Result<(), SettingsError> {
        if selection.is_empty() {
            return Ok(());
        }

        let wanted: HashSet<String> = selection.iter().map(|s| s.to_lowercase()).collect();
        let known: HashSet<String> = self.suites.iter().map(|s| s.key()).collect();
        if let Some(unknown) = wanted.iter().find(|w| !known.contains(*w)) {
            return Err(bootstrap("unknown suite", unknown));
        }

        self.suites.retain(|s| wanted.contains(&s.key()));
        Ok(())
    }
}

fn bootstrap(message: &str, setting: impl std::fmt::Debug) -> SettingsError {
    SettingsError::Bootstrap {
        message: message.to_string(),
        setting: format!("{:?}", setting),
    }
}

// /////////////////////////////////////////////////////
// // Unit Tests ///////////////////////////////////////
