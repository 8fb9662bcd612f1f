//! Genomics queries: variant-trait associations and variant lookups
//!
//! Association results can be summarized server-side into per-trait-category
//! counts; the full record set never leaves the database in that case.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::PgPool;

use goa_common::types::GenomicSpan;

use crate::params::Parameters;
use crate::response::{AssociationRecord, ResponseContent, ResponseData, VariantRecord};

use super::{DataSource, QueryError};

/// Associations below this p-value are considered genome-wide significant
pub const GENOME_WIDE_SIGNIFICANCE: f64 = 5e-8;

/// Select list for association rows; must cover every decoded column of
/// `AssociationRecord`, including the derived -log10(p) score
const ASSOCIATION_COLUMNS: &str = "a.variant_id, a.track_id, a.trait AS trait, \
     a.trait_category, a.pvalue, -LOG(a.pvalue) AS neg_log10_pvalue";

#[derive(Clone)]
pub struct AssociationQuery {
    pool: PgPool,
}

impl AssociationQuery {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn filters(
        params: &Parameters,
    ) -> Result<(Option<GenomicSpan>, Option<Vec<String>>, f64), QueryError> {
        let span = params
            .get_str("span")
            .map(|s| s.parse::<GenomicSpan>())
            .transpose()
            .map_err(|e| QueryError::InvalidParameter(e.to_string()))?;
        let track_ids = params.get_list("track");
        let pvalue_max = params
            .get_str("pvalue")
            .map(|p| {
                p.parse::<f64>()
                    .map_err(|_| QueryError::InvalidParameter(format!("invalid pvalue: {p}")))
            })
            .transpose()?
            .unwrap_or(GENOME_WIDE_SIGNIFICANCE);
        Ok((span, track_ids, pvalue_max))
    }

    async fn fetch_associations(
        &self,
        params: &Parameters,
    ) -> Result<Vec<AssociationRecord>, QueryError> {
        let (span, track_ids, pvalue_max) = Self::filters(params)?;
        let (chrom, start, end) = span_binds(&span);

        let sql = format!(
            r#"
            SELECT {ASSOCIATION_COLUMNS}
            FROM variant_associations a
            JOIN variants v ON v.variant_id = a.variant_id
            WHERE ($1::TEXT[] IS NULL OR a.track_id = ANY($1))
              AND ($2::TEXT IS NULL
                   OR (v.chrom = $2 AND v.position >= $3 AND v.position < $4))
              AND a.pvalue <= $5
            ORDER BY a.pvalue
            "#
        );

        let records = sqlx::query_as::<_, AssociationRecord>(&sql)
        .bind(track_ids)
        .bind(chrom)
        .bind(start)
        .bind(end)
        .bind(pvalue_max)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn fetch_counts(&self, params: &Parameters) -> Result<BTreeMap<String, u64>, QueryError> {
        let (span, track_ids, pvalue_max) = Self::filters(params)?;
        let (chrom, start, end) = span_binds(&span);

        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT COALESCE(a.trait_category, 'uncategorized') AS category, COUNT(*)
            FROM variant_associations a
            JOIN variants v ON v.variant_id = a.variant_id
            WHERE ($1::TEXT[] IS NULL OR a.track_id = ANY($1))
              AND ($2::TEXT IS NULL
                   OR (v.chrom = $2 AND v.position >= $3 AND v.position < $4))
              AND a.pvalue <= $5
            GROUP BY category
            ORDER BY category
            "#,
        )
        .bind(track_ids)
        .bind(chrom)
        .bind(start)
        .bind(end)
        .bind(pvalue_max)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(category, count)| (category, count.max(0) as u64))
            .collect())
    }
}

fn span_binds(span: &Option<GenomicSpan>) -> (Option<String>, i64, i64) {
    match span {
        Some(s) => (Some(s.chrom.clone()), s.start as i64, s.end as i64),
        None => (None, 0, 0),
    }
}

#[async_trait]
impl DataSource for AssociationQuery {
    #[tracing::instrument(skip(self, params))]
    async fn fetch(
        &self,
        params: &Parameters,
        content: ResponseContent,
    ) -> Result<ResponseData, QueryError> {
        match content {
            ResponseContent::Counts => Ok(ResponseData::Counts(self.fetch_counts(params).await?)),
            ResponseContent::Ids => {
                let records = self.fetch_associations(params).await?;
                Ok(ResponseData::Ids(unique_variant_ids(records)))
            }
            ResponseContent::Summary => {
                let records = self.fetch_associations(params).await?;
                Ok(ResponseData::Associations(
                    records.into_iter().map(AssociationRecord::summarize).collect(),
                ))
            }
            _ => Ok(ResponseData::Associations(
                self.fetch_associations(params).await?,
            )),
        }
    }
}

/// Distinct variant ids from an association set; the input is p-value
/// ordered, so duplicates are rarely adjacent
fn unique_variant_ids(records: Vec<AssociationRecord>) -> Vec<String> {
    let mut ids: Vec<String> = records.into_iter().map(|r| r.variant_id).collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Variant lookup by id or refSNP id
#[derive(Clone)]
pub struct VariantQuery {
    pool: PgPool,
}

impl VariantQuery {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_variants(&self, params: &Parameters) -> Result<Vec<VariantRecord>, QueryError> {
        let ids = params
            .get_list("id")
            .ok_or_else(|| QueryError::InvalidParameter("variant id required".into()))?;

        let records = sqlx::query_as::<_, VariantRecord>(
            r#"
            SELECT variant_id, ref_snp_id, chrom, position,
                   ref_allele, alt_allele, most_severe_consequence
            FROM variants
            WHERE variant_id = ANY($1) OR ref_snp_id = ANY($1)
            ORDER BY chrom, position
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}

#[async_trait]
impl DataSource for VariantQuery {
    #[tracing::instrument(skip(self, params))]
    async fn fetch(
        &self,
        params: &Parameters,
        content: ResponseContent,
    ) -> Result<ResponseData, QueryError> {
        match content {
            ResponseContent::Ids => {
                let records = self.fetch_variants(params).await?;
                Ok(ResponseData::Ids(
                    records.into_iter().map(|r| r.variant_id).collect(),
                ))
            }
            ResponseContent::Counts => {
                let records = self.fetch_variants(params).await?;
                Ok(ResponseData::Counts(summarize_consequences(&records)))
            }
            ResponseContent::Summary => {
                let records = self.fetch_variants(params).await?;
                Ok(ResponseData::Variants(
                    records.into_iter().map(VariantRecord::summarize).collect(),
                ))
            }
            _ => Ok(ResponseData::Variants(self.fetch_variants(params).await?)),
        }
    }
}

/// Per-consequence variant counts for the COUNTS content shape
fn summarize_consequences(records: &[VariantRecord]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for record in records {
        let category = record
            .most_severe_consequence
            .clone()
            .unwrap_or_else(|| "unspecified".to_string());
        *counts.entry(category).or_insert(0u64) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::RowModel;

    fn association(variant_id: &str, pvalue: f64) -> AssociationRecord {
        AssociationRecord {
            variant_id: variant_id.to_string(),
            track_id: "NG00075".to_string(),
            trait_name: "Alzheimer's disease".to_string(),
            trait_category: Some("neurodegenerative".to_string()),
            pvalue,
            neg_log10_pvalue: -pvalue.log10(),
        }
    }

    fn variant(id: &str, consequence: Option<&str>) -> VariantRecord {
        VariantRecord {
            variant_id: id.to_string(),
            ref_snp_id: None,
            chrom: "chr19".to_string(),
            position: 44_908_684,
            ref_allele: "T".to_string(),
            alt_allele: "C".to_string(),
            most_severe_consequence: consequence.map(str::to_string),
        }
    }

    #[test]
    fn test_association_select_list_covers_every_decoded_column() {
        for field in AssociationRecord::fields() {
            assert!(
                ASSOCIATION_COLUMNS.contains(field.id),
                "select list is missing column '{}'",
                field.id
            );
        }
    }

    #[test]
    fn test_unique_variant_ids_drops_nonadjacent_duplicates() {
        // p-value ordering interleaves the duplicate
        let records = vec![
            association("19:44908684:T:C", 1e-12),
            association("19:45411941:T:C", 1e-10),
            association("19:44908684:T:C", 1e-9),
        ];
        assert_eq!(
            unique_variant_ids(records),
            vec!["19:44908684:T:C".to_string(), "19:45411941:T:C".to_string()]
        );
    }

    #[test]
    fn test_summarize_consequences() {
        let records = vec![
            variant("19:44908684:T:C", Some("missense_variant")),
            variant("19:44908822:C:T", Some("missense_variant")),
            variant("19:45411941:T:C", None),
        ];
        let counts = summarize_consequences(&records);
        assert_eq!(counts.get("missense_variant"), Some(&2));
        assert_eq!(counts.get("unspecified"), Some(&1));
    }
}
