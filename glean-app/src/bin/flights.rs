//! Drive a browser through the fare search once per parameter set.
use anyhow::Result;
use clap::Parser;
use glean_app::{BatchArgs, bootstrap, finish};
use glean_common::load_params;
use glean_config::{FlightsConfig, SettleMode};
use glean_drivers::glean_browser::{ChromeSessionFactory, Settle, WaitPolicy};
use glean_scrape::flights::{FlightPlan, FlightsJob, ListingRule};
use glean_scrape::{Pacing, TokioPacer, run_batch};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version, about = "Search fares in a browser for each parameter set")]
struct Cli {
    #[command(flatten)]
    batch: BatchArgs,

    /// Seconds to settle after each navigation and to wait between searches.
    #[arg(short, long, default_value_t = 1)]
    time: u64,
}

fn plan(cfg: &FlightsConfig, time: Duration) -> FlightPlan {
    let wait = WaitPolicy {
        timeout: Duration::from_secs(cfg.wait_timeout_secs),
        poll: Duration::from_millis(cfg.poll_interval_ms),
    };
    let settle = match cfg.settle {
        SettleMode::Fixed => Settle::Fixed(time),
        SettleMode::DocumentReady => Settle::DocumentReady(wait),
    };
    let s = &cfg.selectors;

    FlightPlan {
        home_url: cfg.home_url.clone(),
        booking_url: cfg.booking_url.clone(),
        submit_selector: cfg.submit_selector.clone(),
        results_selector: cfg.results_selector.clone(),
        wait,
        settle,
        listing: ListingRule {
            listing: s.listing.clone(),
            time: s.time.clone(),
            duration: s.duration.clone(),
            fare_button: s.fare_button.clone(),
            fare_label: s.fare_label.clone(),
            stop: s.stop.clone(),
        },
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = bootstrap("flights", &cli.batch.config)?.flights;

    let params = load_params(&cli.batch.params)?;
    let time = Duration::from_secs(cli.time);
    let factory = ChromeSessionFactory::new(&cfg.webdriver_url, cfg.headless);
    let job = FlightsJob::new(factory, plan(&cfg, time));

    let report = run_batch(&job, &params, time, Pacing::AfterEvery, &TokioPacer).await;

    finish(&cli.batch, &report)
}
