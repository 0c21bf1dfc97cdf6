//! Fetch one news section page and write its `(headline, link)` pairs.
use anyhow::Result;
use glean_app::{DEFAULT_CONFIG, bootstrap};
use glean_common::output::write_json_pretty;
use glean_scrape::headlines::{HeadlineRule, fetch_headlines};
use std::path::Path;
use std::time::Duration;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cfg = bootstrap("headlines", Path::new(DEFAULT_CONFIG))?.headlines;

    let rule = HeadlineRule {
        container: cfg.container,
        text: cfg.text,
        link: cfg.link,
        link_attr: cfg.link_attr,
    };
    let headlines =
        fetch_headlines(&cfg.url, Duration::from_secs(cfg.timeout_secs), &rule).await?;

    write_json_pretty(&cfg.output, &headlines)?;
    info!(output = %cfg.output, count = headlines.len(), "glean.done");
    println!("wrote {} headlines to {}", headlines.len(), cfg.output);
    Ok(())
}
