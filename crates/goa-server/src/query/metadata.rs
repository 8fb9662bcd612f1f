//! Track metadata queries against the application database
//!
//! Filters are bound as nullable parameters so one statement serves both
//! the filtered and unfiltered cases. Content shaping happens here: the
//! same WHERE clause feeds full records, id lists, URL lists, and
//! per-category counts.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::params::Parameters;
use crate::response::{ResponseContent, ResponseData, TrackRecord};

use super::{DataSource, QueryError};

const TRACK_COLUMNS: &str = "track_id, name, description, genome_build, \
     feature_type, data_source, data_category, url";

/// Metadata data source backed by the track registry tables
#[derive(Clone)]
pub struct TrackMetadataQuery {
    pool: PgPool,
}

impl TrackMetadataQuery {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn filters(params: &Parameters) -> (Option<Vec<String>>, Option<String>, Option<String>) {
        let track_ids = params.get_list("track");
        let assembly = params.get_str("assembly").map(str::to_owned);
        let keyword = params
            .get_str("keyword")
            .map(|k| format!("%{}%", k.to_lowercase()));
        (track_ids, assembly, keyword)
    }

    async fn fetch_records(&self, params: &Parameters) -> Result<Vec<TrackRecord>, QueryError> {
        let (track_ids, assembly, keyword) = Self::filters(params);

        let sql = format!(
            r#"
            SELECT {TRACK_COLUMNS}
            FROM track_metadata
            WHERE ($1::TEXT[] IS NULL OR track_id = ANY($1))
              AND ($2::TEXT IS NULL OR genome_build = $2)
              AND ($3::TEXT IS NULL
                   OR LOWER(name) LIKE $3
                   OR LOWER(COALESCE(description, '')) LIKE $3
                   OR LOWER(COALESCE(data_source, '')) LIKE $3)
            ORDER BY track_id
            "#
        );

        let records = sqlx::query_as::<_, TrackRecord>(&sql)
            .bind(track_ids)
            .bind(assembly)
            .bind(keyword)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn fetch_counts(&self, params: &Parameters) -> Result<BTreeMap<String, u64>, QueryError> {
        let (track_ids, assembly, keyword) = Self::filters(params);

        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT COALESCE(data_category, 'uncategorized') AS category, COUNT(*)
            FROM track_metadata
            WHERE ($1::TEXT[] IS NULL OR track_id = ANY($1))
              AND ($2::TEXT IS NULL OR genome_build = $2)
              AND ($3::TEXT IS NULL
                   OR LOWER(name) LIKE $3
                   OR LOWER(COALESCE(description, '')) LIKE $3
                   OR LOWER(COALESCE(data_source, '')) LIKE $3)
            GROUP BY category
            ORDER BY category
            "#,
        )
        .bind(track_ids)
        .bind(assembly)
        .bind(keyword)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(category, count)| (category, count.max(0) as u64))
            .collect())
    }
}

#[async_trait]
impl DataSource for TrackMetadataQuery {
    #[tracing::instrument(skip(self, params))]
    async fn fetch(
        &self,
        params: &Parameters,
        content: ResponseContent,
    ) -> Result<ResponseData, QueryError> {
        match content {
            ResponseContent::Counts => Ok(ResponseData::Counts(self.fetch_counts(params).await?)),
            ResponseContent::Ids => {
                let records = self.fetch_records(params).await?;
                Ok(ResponseData::Ids(
                    records.into_iter().map(|r| r.track_id).collect(),
                ))
            }
            ResponseContent::Urls => {
                let records = self.fetch_records(params).await?;
                Ok(ResponseData::Urls(
                    records.into_iter().filter_map(|r| r.url).collect(),
                ))
            }
            ResponseContent::Summary => {
                let records = self.fetch_records(params).await?;
                Ok(ResponseData::Tracks(
                    records.into_iter().map(TrackRecord::summarize).collect(),
                ))
            }
            ResponseContent::Full => {
                Ok(ResponseData::Tracks(self.fetch_records(params).await?))
            }
        }
    }
}
