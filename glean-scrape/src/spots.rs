//! Endpoint-query fetcher: one GET per parameter set against a JSON API.
use crate::batch::BatchJob;
use crate::error::ScrapeError;
use async_trait::async_trait;
use glean_common::{ParamSet, path::JsonPath, query_pairs};
use glean_http::{HttpClient, RequestOpts};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::time::Duration;
use tracing::debug;

/// The originating parameters next to the extracted sub-document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotRecord {
    pub params: ParamSet,
    pub data: Value,
}

pub struct SpotsJob {
    client: HttpClient,
    data_path: JsonPath,
}

impl SpotsJob {
    pub fn new(base_url: &str, data_path: &str, timeout: Duration) -> Result<Self, ScrapeError> {
        Ok(Self {
            client: HttpClient::new(base_url)?.with_timeout(timeout),
            data_path: JsonPath::parse(data_path)?,
        })
    }

    /// GET the endpoint with `params` as the query string and pull the
    /// configured path out of the response.
    pub async fn fetch(&self, params: &ParamSet) -> Result<SpotRecord, ScrapeError> {
        let pairs = query_pairs(params)?;
        let opts = RequestOpts {
            query: Some(
                pairs
                    .iter()
                    .map(|(k, v)| (k.as_str(), Cow::Borrowed(v.as_str())))
                    .collect(),
            ),
            ..Default::default()
        };

        let body: Value = self.client.get_json("", opts).await?;
        let data = self.data_path.extract(&body)?.clone();
        debug!(path = %self.data_path, "spots.extracted");

        Ok(SpotRecord {
            params: params.clone(),
            data,
        })
    }
}

#[async_trait]
impl BatchJob for SpotsJob {
    type Record = SpotRecord;

    fn name(&self) -> &'static str {
        "spots"
    }

    async fn run(&self, _index: usize, params: &ParamSet) -> Result<SpotRecord, ScrapeError> {
        self.fetch(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_path_is_rejected_up_front() {
        let err = SpotsJob::new("https://example.test/mapview", "data..spots", Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, ScrapeError::Path(_)));
    }

    #[test]
    fn bad_base_url_is_rejected_up_front() {
        let err = SpotsJob::new("not a url", "data.spots", Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, ScrapeError::Http(_)));
    }
}
