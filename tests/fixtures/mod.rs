#![allow(dead_code)]

use std::path::{Path, PathBuf};

use seqbench::settings::{BenchmarkKind, CaseSetting, Settings, SuiteSetting};
use seqbench::tracing::{get_subscriber, init_subscriber};

pub fn init_tracing<S: AsRef<str>>(name: S) {
    let subscriber = get_subscriber(name.as_ref(), "warn");
    init_subscriber(subscriber);
}

/// Writes a shell script standing in for a pre-built benchmark executable.
#[cfg(unix)]
pub fn write_benchmark_script(bin_dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = bin_dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("failed to write benchmark script");
    let mut permissions = std::fs::metadata(&path).expect("script metadata").permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).expect("failed to mark script executable");
    path
}

pub fn single_8_settings(bin_dir: &Path, output_dir: &Path, trials: usize, containers: &[&str]) -> Settings {
    Settings {
        bin_dir: bin_dir.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        trials,
        containers: containers.iter().map(|c| c.to_string()).collect(),
        suites: vec![SuiteSetting {
            kind: BenchmarkKind::Single,
            element_bits: 8,
            cases: vec![
                CaseSetting {
                    label: "256".to_string(),
                    args: vec!["256".to_string(), "2107779313".to_string(), "15865477950454414828".to_string()],
                },
                CaseSetting {
                    label: "7936".to_string(),
                    args: vec!["7936".to_string(), "976634119".to_string(), "3238950223561105499".to_string()],
                },
            ],
        }],
    }
}
