//! Browser-driven fetcher: one WebDriver session per parameter set.
//!
//! Each search walks `Init → HomeLoaded → QueryLoaded → SearchSubmitted →
//! ResultsReady → Extracted → Closed`. The session is closed on every exit
//! path; a failure is tagged with the stage it was moving into.
pub mod extract;
pub mod query;

use crate::batch::BatchJob;
use crate::error::{ScrapeError, Stage};
use async_trait::async_trait;
use glean_common::ParamSet;
use glean_drivers::glean_browser::{
    BrowserSession, DriverError, SessionFactory, Settle, WaitPolicy,
};
use serde::Serialize;
use tracing::{debug, warn};

pub use extract::{Listing, ListingRule, extract_listings};
pub use query::make_query;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightRecord {
    pub params: ParamSet,
    pub results: Vec<Listing>,
}

/// Everything a search needs besides the browser itself.
#[derive(Debug, Clone)]
pub struct FlightPlan {
    pub home_url: String,
    pub booking_url: String,
    pub submit_selector: String,
    pub results_selector: String,
    pub wait: WaitPolicy,
    pub settle: Settle,
    pub listing: ListingRule,
}

pub struct FlightsJob<F> {
    factory: F,
    plan: FlightPlan,
}

impl<F: SessionFactory> FlightsJob<F> {
    pub fn new(factory: F, plan: FlightPlan) -> Self {
        Self { factory, plan }
    }

    /// Run one search in a fresh session.
    pub async fn search(&self, params: &ParamSet) -> Result<FlightRecord, ScrapeError> {
        let query_url = make_query(&self.plan.booking_url, params)
            .map_err(|e| ScrapeError::at(Stage::QueryLoaded, e))?;

        let mut session = self
            .factory
            .open()
            .await
            .map_err(|e| ScrapeError::at(Stage::Init, e))?;

        let outcome = drive(session.as_mut(), &self.plan, &query_url).await;

        if let Err(e) = session.close().await {
            warn!(target: "browser.stage", error = %e, "close failed");
        }
        debug!(target: "browser.stage", stage = %Stage::Closed, "session released");

        Ok(FlightRecord {
            params: params.clone(),
            results: outcome?,
        })
    }
}

async fn drive(
    session: &mut dyn BrowserSession,
    plan: &FlightPlan,
    query_url: &str,
) -> Result<Vec<Listing>, ScrapeError> {
    let at = |stage: Stage| move |e: DriverError| ScrapeError::at(stage, e);

    session
        .goto(&plan.home_url)
        .await
        .map_err(at(Stage::HomeLoaded))?;
    session.settle(plan.settle).await.map_err(at(Stage::HomeLoaded))?;
    debug!(target: "browser.stage", stage = %Stage::HomeLoaded, "reached");

    session.goto(query_url).await.map_err(at(Stage::QueryLoaded))?;
    session.settle(plan.settle).await.map_err(at(Stage::QueryLoaded))?;
    debug!(target: "browser.stage", stage = %Stage::QueryLoaded, url = %query_url, "reached");

    session
        .click_when_clickable(&plan.submit_selector, plan.wait)
        .await
        .map_err(at(Stage::SearchSubmitted))?;
    debug!(target: "browser.stage", stage = %Stage::SearchSubmitted, "reached");

    session
        .wait_for_present(&plan.results_selector, plan.wait)
        .await
        .map_err(at(Stage::ResultsReady))?;
    debug!(target: "browser.stage", stage = %Stage::ResultsReady, "reached");

    let source = session.page_source().await.map_err(at(Stage::Extracted))?;
    let listings = extract_listings(&source, &plan.listing)
        .map_err(|e| ScrapeError::at(Stage::Extracted, e))?;
    debug!(target: "browser.stage", stage = %Stage::Extracted, listings = listings.len(), "reached");

    Ok(listings)
}

#[async_trait]
impl<F: SessionFactory> BatchJob for FlightsJob<F> {
    type Record = FlightRecord;

    fn name(&self) -> &'static str {
        "flights"
    }

    async fn run(&self, _index: usize, params: &ParamSet) -> Result<FlightRecord, ScrapeError> {
        self.search(params).await
    }
}
