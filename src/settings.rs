pub use model::*;

mod model;

use std::path::PathBuf;

use clap::Parser;
use config::{Config, Environment, File, FileFormat};

use crate::error::SettingsError;

/// Built-in suites, containers and trial count; every later source overrides these.
pub const DEFAULT_SETTINGS: &str = include_str!("../resources/default.toml");

/// Prefix for environment overrides, e.g. `SEQBENCH__TRIALS=3`.
pub const ENV_PREFIX: &str = "SEQBENCH";

#[derive(Debug, Clone, Parser)]
#[command(name = "seqbench", version, author = "Damon Rolfs")]
#[command(about = "Runs sequence container benchmark executables and charts the best of several trials.")]
pub struct CliOptions {
    /// directory holding the pre-built `bench_{kind}_{container}_{bits}` executables.
    pub bin_dir: PathBuf,

    /// directory receiving the `.svg` charts and `.txt` raw results.
    pub output_dir: PathBuf,

    /// additional configuration file layered over the built-in defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// number of times each executable runs per case; the fastest run is kept.
    #[arg(short, long)]
    pub trials: Option<usize>,

    /// restrict the run to these containers, in this order.
    #[arg(long = "container")]
    pub containers: Vec<String>,

    /// restrict the run to these suites, named `{kind}_{bits}` (e.g. `single_8`).
    #[arg(long = "suite")]
    pub suites: Vec<String>,

    /// default tracing filter when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[tracing::instrument(level = "info")]
pub fn get_settings(options: &CliOptions) -> Result<Settings, SettingsError> {
    let mut builder = Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml));

    if let Some(ref config_path) = options.config {
        builder = builder.add_source(File::from(config_path.as_path()).required(true));
    }

    // Add in settings from environment variables (with a prefix of SEQBENCH and '__' as separator)
    // E.g. `SEQBENCH__TRIALS=3` would set `Settings.trials`, `SEQBENCH__CONTAINERS=deque,vector` the containers
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("containers"),
    );

    builder = builder
        .set_override("bin_dir", options.bin_dir.to_string_lossy().to_string())?
        .set_override("output_dir", options.output_dir.to_string_lossy().to_string())?
        .set_override_option("trials", options.trials.map(|t| t as u64))?;

    if !options.containers.is_empty() {
        builder = builder.set_override("containers", options.containers.clone())?;
    }

    let mut settings: Settings = builder.build()?.try_deserialize()?;
    settings.retain_suites(&options.suites)?;
    settings.validate()?;

    tracing::info!(
        bin_dir=?settings.bin_dir, output_dir=?settings.output_dir, trials=%settings.trials,
        containers=?settings.containers, suites=?settings.suites.iter().map(|s| s.key()).collect::<Vec<_>>(),
        "settings loaded"
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_ok};
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};

    // every test here loads settings from the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn options(args: &[&str]) -> CliOptions {
        let mut argv = vec!["seqbench", "bin", "out"];
        argv.extend_from_slice(args);
        CliOptions::parse_from(argv)
    }

    #[test]
    fn test_default_settings() {
        let _env = env_guard();
        let settings = assert_ok!(get_settings(&options(&[])));
        assert_eq!(settings.bin_dir, PathBuf::from("bin"));
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert_eq!(settings.trials, 5);
        assert_eq!(
            settings.containers,
            vec!["segmented_tree_seq", "btree_seq", "bpt_sequence", "avl_array", "deque", "vector"]
        );
        assert_eq!(
            settings.suites.iter().map(|s| s.key()).collect::<Vec<_>>(),
            vec!["single_8", "single_64", "range_8", "range_64"]
        );

        let range_8 = &settings.suites[2];
        assert_eq!(range_8.labels(), vec!["1x7626496", "31x246016", "961x7936", "29791x256"]);
        assert_eq!(
            range_8.cases[0].args,
            vec!["1", "7626496", "1319121800", "13937110459523125406"]
        );
    }

    #[test]
    fn test_cli_overrides() {
        let _env = env_guard();
        let settings = assert_ok!(get_settings(&options(&[
            "--trials",
            "2",
            "--container",
            "vector",
            "--container",
            "deque",
            "--suite",
            "range_64",
        ])));
        assert_eq!(settings.trials, 2);
        assert_eq!(settings.containers, vec!["vector", "deque"]);
        assert_eq!(settings.suites.len(), 1);
        assert_eq!(settings.suites[0].key(), "range_64");
    }

    #[test]
    fn test_config_file_layer() {
        let _env = env_guard();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
containers = ["vector"]

[[suites]]
kind = "single"
element_bits = 16
cases = [{{ label = "10", args = ["10", "1", "2"] }}]
"#
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let settings = assert_ok!(get_settings(&options(&["--config", path.as_str()])));
        assert_eq!(settings.trials, 5);
        assert_eq!(settings.containers, vec!["vector"]);
        assert_eq!(settings.suites.len(), 1);
        assert_eq!(settings.suites[0].kind, BenchmarkKind::Single);
        assert_eq!(settings.suites[0].element_bits, 16);
    }

    #[test]
    fn test_invalid_overrides_are_rejected() {
        let _env = env_guard();
        assert_err!(get_settings(&options(&["--trials", "0"])));
        assert_err!(get_settings(&options(&["--suite", "single_16"])));
    }

    #[test]
    fn test_environment_layer() {
        let _env = env_guard();
        std::env::set_var("SEQBENCH__TRIALS", "3");
        std::env::set_var("SEQBENCH__CONTAINERS", "vector,deque");
        let from_env = get_settings(&options(&[]));
        let cli_wins = get_settings(&options(&["--trials", "2", "--container", "avl_array"]));
        std::env::remove_var("SEQBENCH__TRIALS");
        std::env::remove_var("SEQBENCH__CONTAINERS");

        let from_env = assert_ok!(from_env);
        assert_eq!(from_env.trials, 3);
        assert_eq!(from_env.containers, vec!["vector", "deque"]);

        let cli_wins = assert_ok!(cli_wins);
        assert_eq!(cli_wins.trials, 2);
        assert_eq!(cli_wins.containers, vec!["avl_array"]);

        let cleared = assert_ok!(get_settings(&options(&[])));
        assert_eq!(cleared.trials, 5);
        assert_eq!(cleared.containers.len(), 6);
    }
}
