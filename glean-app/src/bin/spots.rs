//! Query the spots endpoint once per parameter set.
use anyhow::Result;
use clap::Parser;
use glean_app::{BatchArgs, bootstrap, finish};
use glean_common::load_params;
use glean_scrape::spots::SpotsJob;
use glean_scrape::{Pacing, TokioPacer, run_batch};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version, about = "Fetch surf spot data for each parameter set")]
struct Cli {
    #[command(flatten)]
    batch: BatchArgs,

    /// Seconds to wait after each successful request.
    #[arg(short, long, default_value_t = 0)]
    time: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = bootstrap("spots", &cli.batch.config)?.spots;

    let params = load_params(&cli.batch.params)?;
    let job = SpotsJob::new(
        &cfg.base_url,
        &cfg.data_path,
        Duration::from_secs(cfg.timeout_secs),
    )?;

    let report = run_batch(
        &job,
        &params,
        Duration::from_secs(cli.time),
        Pacing::AfterSuccess,
        &TokioPacer,
    )
    .await;

    finish(&cli.batch, &report)
}
