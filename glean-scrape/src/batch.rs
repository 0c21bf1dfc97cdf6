//! Sequential batch loop with per-item failure isolation.
//!
//! Items run one at a time in input order. A failing item is logged and
//! recorded in [`BatchReport::failures`]; it never aborts the batch and never
//! appears among the records.
use crate::error::{ScrapeError, Stage};
use async_trait::async_trait;
use glean_common::{ParamSet, describe_params};
use serde::Serialize;
use std::time::Duration;
use tracing::{Instrument, error, info, info_span};

/// One fetch/extract cycle driven by a parameter set.
#[async_trait]
pub trait BatchJob: Send + Sync {
    type Record: Send;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn run(&self, index: usize, params: &ParamSet) -> Result<Self::Record, ScrapeError>;
}

/// Inter-item delay.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// When the delay is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Only after an item succeeds.
    AfterSuccess,
    /// After every item, whatever its outcome.
    AfterEvery,
}

/// A parameter set that produced no record.
#[derive(Debug, Clone, Serialize)]
pub struct ItemFailure {
    pub index: usize,
    pub params: ParamSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    pub reason: String,
}

#[derive(Debug)]
pub struct BatchReport<T> {
    pub records: Vec<T>,
    pub failures: Vec<ItemFailure>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            failures: Vec::new(),
        }
    }
}

pub async fn run_batch<J: BatchJob>(
    job: &J,
    params: &[ParamSet],
    delay: Duration,
    pacing: Pacing,
    pacer: &dyn Pacer,
) -> BatchReport<J::Record> {
    let mut report = BatchReport::default();

    for (index, item) in params.iter().enumerate() {
        let span = info_span!("item", job = job.name(), index);
        let outcome = job.run(index, item).instrument(span).await;

        let succeeded = outcome.is_ok();
        match outcome {
            Ok(record) => report.records.push(record),
            Err(e) => {
                let params_text = describe_params(item);
                error!(
                    job = job.name(),
                    index,
                    params = %params_text,
                    stage = ?e.stage(),
                    error = %e,
                    "scrape.item.failed"
                );
                report.failures.push(ItemFailure {
                    index,
                    params: item.clone(),
                    stage: e.stage(),
                    reason: e.to_string(),
                });
            }
        }

        if succeeded || pacing == Pacing::AfterEvery {
            pacer.pause(delay).await;
        }
    }

    info!(
        job = job.name(),
        total = params.len(),
        succeeded = report.records.len(),
        failed = report.failures.len(),
        "scrape.batch.done"
    );
    report
}
