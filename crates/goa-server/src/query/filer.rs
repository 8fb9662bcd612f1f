//! FILER functional-genomics repository client
//!
//! FILER is a third-party service, so every failure here is a lookup
//! error rather than an internal one. The overlaps endpoint returns
//! BED-like interval hits for a set of tracks over one genomic span.

use async_trait::async_trait;
use serde::Deserialize;

use goa_common::types::GenomicSpan;

use crate::params::Parameters;
use crate::response::{IntervalRecord, ResponseContent, ResponseData};

use super::{DataSource, QueryError};

/// One interval hit as FILER reports it
#[derive(Debug, Deserialize)]
struct FilerHit {
    chrom: String,
    #[serde(rename = "chromStart")]
    start: u64,
    #[serde(rename = "chromEnd")]
    end: u64,
    name: Option<String>,
    score: Option<f64>,
    strand: Option<String>,
    #[serde(rename = "Identifier")]
    track_id: String,
}

impl From<FilerHit> for IntervalRecord {
    fn from(hit: FilerHit) -> Self {
        IntervalRecord {
            chrom: hit.chrom,
            start: hit.start,
            end: hit.end,
            name: hit.name,
            score: hit.score,
            strand: hit.strand,
            track_id: hit.track_id,
        }
    }
}

/// HTTP client for the FILER repository
#[derive(Clone)]
pub struct FilerClient {
    base_url: String,
    client: reqwest::Client,
}

impl FilerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch interval hits for `track_ids` overlapping `span`
    #[tracing::instrument(skip(self))]
    pub async fn overlaps(
        &self,
        track_ids: &[String],
        span: &GenomicSpan,
    ) -> Result<Vec<IntervalRecord>, QueryError> {
        let url = format!("{}/get_overlaps", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("id", track_ids.join(",")),
                ("span", span.to_string()),
                ("outputFormat", "json".to_string()),
            ])
            .send()
            .await
            .map_err(|e| QueryError::Lookup(format!("FILER request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(QueryError::Lookup(format!(
                "FILER returned {} for {}",
                response.status(),
                span
            )));
        }

        let hits: Vec<FilerHit> = response
            .json()
            .await
            .map_err(|e| QueryError::Lookup(format!("malformed FILER response: {e}")))?;

        Ok(hits.into_iter().map(IntervalRecord::from).collect())
    }
}

#[async_trait]
impl DataSource for FilerClient {
    async fn fetch(
        &self,
        params: &Parameters,
        content: ResponseContent,
    ) -> Result<ResponseData, QueryError> {
        let track_ids = params
            .get_list("_tracks")
            .ok_or_else(|| QueryError::InvalidParameter("track list required".into()))?;
        let span = params
            .get_str("span")
            .ok_or_else(|| QueryError::InvalidParameter("span required".into()))?
            .parse::<GenomicSpan>()
            .map_err(|e| QueryError::InvalidParameter(e.to_string()))?;

        let intervals = self.overlaps(&track_ids, &span).await?;

        match content {
            ResponseContent::Counts => {
                let mut counts = std::collections::BTreeMap::new();
                for interval in &intervals {
                    *counts.entry(interval.track_id.clone()).or_insert(0u64) += 1;
                }
                Ok(ResponseData::Counts(counts))
            }
            ResponseContent::Ids => {
                let mut ids: Vec<String> =
                    intervals.into_iter().map(|i| i.track_id).collect();
                ids.sort();
                ids.dedup();
                Ok(ResponseData::Ids(ids))
            }
            ResponseContent::Summary => Ok(ResponseData::Intervals(
                intervals.into_iter().map(IntervalRecord::summarize).collect(),
            )),
            _ => Ok(ResponseData::Intervals(intervals)),
        }
    }
}
