use glean_common::{ParamError, path::PathError};
use glean_drivers::glean_browser::DriverError;
use glean_http::HttpError;
use serde::Serialize;
use std::fmt;

/// Failures while pulling fields out of a parsed document.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("element {index} matched by `{container}` has no `{child}` descendant")]
    MissingChild {
        container: String,
        index: usize,
        child: String,
    },

    #[error("element {index} matched by `{container}`: `{child}` has no `{attr}` attribute")]
    MissingAttribute {
        container: String,
        index: usize,
        child: String,
        attr: String,
    },

    #[error("unable to find listing elements matching `{0}`")]
    NoListings(String),
}

/// Progress of one browser-driven search. A failure is tagged with the
/// state the session was moving into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    HomeLoaded,
    QueryLoaded,
    SearchSubmitted,
    ResultsReady,
    Extracted,
    Closed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::HomeLoaded => "home_loaded",
            Stage::QueryLoaded => "query_loaded",
            Stage::SearchSubmitted => "search_submitted",
            Stage::ResultsReady => "results_ready",
            Stage::Extracted => "extracted",
            Stage::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("http: {0}")]
    Http(#[from] HttpError),

    #[error("browser: {0}")]
    Driver(#[from] DriverError),

    #[error("extract: {0}")]
    Extract(#[from] ExtractError),

    #[error("path: {0}")]
    Path(#[from] PathError),

    #[error("params: {0}")]
    Params(#[from] ParamError),

    #[error("step to {stage} failed: {source}")]
    Stage {
        stage: Stage,
        source: Box<ScrapeError>,
    },
}

impl ScrapeError {
    /// Tag an error with the browser stage it interrupted.
    pub fn at(stage: Stage, err: impl Into<ScrapeError>) -> Self {
        ScrapeError::Stage {
            stage,
            source: Box::new(err.into()),
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            ScrapeError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_is_reported() {
        let err = ScrapeError::at(
            Stage::Extracted,
            ExtractError::NoListings("li.row".into()),
        );
        assert_eq!(err.stage(), Some(Stage::Extracted));
        assert_eq!(
            err.to_string(),
            "step to extracted failed: extract: unable to find listing elements matching `li.row`"
        );
    }
}
