//! The three glean pipelines and the plumbing they share.
//!
//! - [`headlines`]: one GET of a section page, `(text, href)` per promo
//! - [`spots`]: one GET per parameter set against a JSON endpoint
//! - [`flights`]: one browser session per parameter set through a booking flow
//! - [`batch`]: sequential per-item loop with failure isolation and pacing
//!
//! Each pipeline stops at records; writing them out is left to the caller
//! (see `glean_common::output`).
pub mod batch;
pub mod error;
pub mod flights;
pub mod headlines;
pub mod html;
pub mod spots;

pub use batch::{BatchJob, BatchReport, ItemFailure, Pacer, Pacing, TokioPacer, run_batch};
pub use error::{ExtractError, ScrapeError, Stage};
