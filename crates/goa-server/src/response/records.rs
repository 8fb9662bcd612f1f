//! Row-model record types and their field metadata
//!
//! Each record type that can appear in a response carries a static field
//! list (id, header, description, cell type) used to derive text headers and
//! table column definitions.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;

/// Rendering type of a table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Text,
    Integer,
    Float,
    Boolean,
}

/// Static metadata for one record field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub id: &'static str,
    pub header: &'static str,
    pub description: &'static str,
    pub cell_type: CellType,
}

/// Contract every row-model record satisfies: a static field list plus
/// per-record cell values aligned with it
pub trait RowModel {
    fn fields() -> &'static [FieldSpec];

    /// Typed cell values, one per field, `Value::Null` for missing
    fn cells(&self) -> Vec<Value>;

    /// String values for text rendering; `None` becomes the caller's
    /// null placeholder
    fn values(&self) -> Vec<Option<String>> {
        self.cells()
            .into_iter()
            .map(|v| match v {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .collect()
    }
}

/// A functional-genomics data track and its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TrackRecord {
    pub track_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub genome_build: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TrackRecord {
    /// Abbreviated form for SUMMARY content: identity and classification
    /// fields only, free text and download links dropped
    pub fn summarize(mut self) -> Self {
        self.description = None;
        self.url = None;
        self
    }
}

impl RowModel for TrackRecord {
    fn fields() -> &'static [FieldSpec] {
        &[
            FieldSpec {
                id: "track_id",
                header: "Track ID",
                description: "Unique track identifier",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "name",
                header: "Name",
                description: "Track display name",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "description",
                header: "Description",
                description: "Track description",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "genome_build",
                header: "Genome Build",
                description: "Reference genome build",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "feature_type",
                header: "Feature",
                description: "Genomic feature type reported by the track",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "data_source",
                header: "Data Source",
                description: "Original data source or consortium",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "data_category",
                header: "Category",
                description: "Broad data category",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "url",
                header: "Download URL",
                description: "Direct data download URL",
                cell_type: CellType::Text,
            },
        ]
    }

    fn cells(&self) -> Vec<Value> {
        vec![
            json!(self.track_id),
            json!(self.name),
            json!(self.description),
            json!(self.genome_build),
            json!(self.feature_type),
            json!(self.data_source),
            json!(self.data_category),
            json!(self.url),
        ]
    }
}

/// A genomic interval returned by a functional-genomics (FILER) track query
///
/// The only record type with a literal BED representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strand: Option<String>,
    pub track_id: String,
}

impl IntervalRecord {
    /// Abbreviated form for SUMMARY content: coordinates and track only
    pub fn summarize(mut self) -> Self {
        self.name = None;
        self.score = None;
        self.strand = None;
        self
    }

    /// Standard six-column BED line; missing optional columns render as '.'
    pub fn to_bed_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom,
            self.start,
            self.end,
            self.name.as_deref().unwrap_or("."),
            self.score
                .map(|s| s.to_string())
                .unwrap_or_else(|| ".".to_string()),
            self.strand.as_deref().unwrap_or(".")
        )
    }
}

impl RowModel for IntervalRecord {
    fn fields() -> &'static [FieldSpec] {
        &[
            FieldSpec {
                id: "chrom",
                header: "Chromosome",
                description: "Chromosome name",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "start",
                header: "Start",
                description: "Interval start (0-based)",
                cell_type: CellType::Integer,
            },
            FieldSpec {
                id: "end",
                header: "End",
                description: "Interval end (exclusive)",
                cell_type: CellType::Integer,
            },
            FieldSpec {
                id: "name",
                header: "Name",
                description: "Feature name",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "score",
                header: "Score",
                description: "Feature score",
                cell_type: CellType::Float,
            },
            FieldSpec {
                id: "strand",
                header: "Strand",
                description: "Strand (+/-)",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "track_id",
                header: "Track ID",
                description: "Source track identifier",
                cell_type: CellType::Text,
            },
        ]
    }

    fn cells(&self) -> Vec<Value> {
        vec![
            json!(self.chrom),
            json!(self.start),
            json!(self.end),
            json!(self.name),
            json!(self.score),
            json!(self.strand),
            json!(self.track_id),
        ]
    }
}

/// An annotated variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VariantRecord {
    pub variant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_snp_id: Option<String>,
    pub chrom: String,
    pub position: i64,
    pub ref_allele: String,
    pub alt_allele: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_severe_consequence: Option<String>,
}

impl VariantRecord {
    /// Abbreviated form for SUMMARY content: allele identity without the
    /// consequence annotation
    pub fn summarize(mut self) -> Self {
        self.most_severe_consequence = None;
        self
    }
}

impl RowModel for VariantRecord {
    fn fields() -> &'static [FieldSpec] {
        &[
            FieldSpec {
                id: "variant_id",
                header: "Variant",
                description: "Variant identifier (chr:pos:ref:alt)",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "ref_snp_id",
                header: "RefSNP",
                description: "dbSNP reference SNP id",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "chrom",
                header: "Chromosome",
                description: "Chromosome name",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "position",
                header: "Position",
                description: "1-based genomic position",
                cell_type: CellType::Integer,
            },
            FieldSpec {
                id: "ref_allele",
                header: "Ref",
                description: "Reference allele",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "alt_allele",
                header: "Alt",
                description: "Alternate allele",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "most_severe_consequence",
                header: "Consequence",
                description: "Most severe predicted consequence",
                cell_type: CellType::Text,
            },
        ]
    }

    fn cells(&self) -> Vec<Value> {
        vec![
            json!(self.variant_id),
            json!(self.ref_snp_id),
            json!(self.chrom),
            json!(self.position),
            json!(self.ref_allele),
            json!(self.alt_allele),
            json!(self.most_severe_consequence),
        ]
    }
}

/// A GWAS association between a variant and a trait
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AssociationRecord {
    pub variant_id: String,
    pub track_id: String,
    #[serde(rename = "trait")]
    #[sqlx(rename = "trait")]
    pub trait_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trait_category: Option<String>,
    pub pvalue: f64,
    pub neg_log10_pvalue: f64,
}

impl AssociationRecord {
    /// Abbreviated form for SUMMARY content: the association itself without
    /// the category annotation
    pub fn summarize(mut self) -> Self {
        self.trait_category = None;
        self
    }
}

impl RowModel for AssociationRecord {
    fn fields() -> &'static [FieldSpec] {
        &[
            FieldSpec {
                id: "variant_id",
                header: "Variant",
                description: "Variant identifier",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "track_id",
                header: "Track ID",
                description: "GWAS summary-statistics track",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "trait",
                header: "Trait",
                description: "Associated trait or phenotype",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "trait_category",
                header: "Category",
                description: "Trait category",
                cell_type: CellType::Text,
            },
            FieldSpec {
                id: "pvalue",
                header: "p-value",
                description: "Association p-value",
                cell_type: CellType::Float,
            },
            FieldSpec {
                id: "neg_log10_pvalue",
                header: "-log10(p)",
                description: "Negative log10 of the p-value",
                cell_type: CellType::Float,
            },
        ]
    }

    fn cells(&self) -> Vec<Value> {
        vec![
            json!(self.variant_id),
            json!(self.track_id),
            json!(self.trait_name),
            json!(self.trait_category),
            json!(self.pvalue),
            json!(self.neg_log10_pvalue),
        ]
    }
}
