use anyhow::{Context, Result};
use clap::Parser;
use seqbench::settings::{get_settings, CliOptions};
use seqbench::tracing::{get_subscriber, init_subscriber};
use seqbench::{Harness, ProcessExecutor};

#[tokio::main]
async fn main() -> Result<()> {
    let options = CliOptions::parse();

    let subscriber = get_subscriber("seqbench", &options.log_level);
    init_subscriber(subscriber);

    let main_span = tracing::info_span!("main");
    let _main_span_guard = main_span.enter();

    let settings = get_settings(&options).context("failed to load settings")?;
    let harness = Harness::new(settings, ProcessExecutor)?;

    let summary = match harness.run().await {
        Ok(summary) => summary,
        Err(err) => {
            tracing::error!(error=?err, "benchmark run failed");
            return Err(err).context("benchmark run failed");
        },
    };

    tracing::info!(
        suites=%summary.suites.len(), benchmarks=%summary.nr_benchmarks(),
        output_dir=?harness.settings().output_dir, "benchmark run complete"
    );
    for path in summary.artifact_paths() {
        println!("{}", path.display());
    }

    Ok(())
}
