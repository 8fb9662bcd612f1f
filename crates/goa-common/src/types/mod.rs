//! Common genomics types used across GOA

use serde::{Deserialize, Serialize};

use crate::error::GoaError;

/// Reference genome build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GenomeBuild {
    #[serde(rename = "GRCh37")]
    GRCh37,
    #[default]
    #[serde(rename = "GRCh38")]
    GRCh38,
}

impl std::str::FromStr for GenomeBuild {
    type Err = GoaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grch37" | "hg19" => Ok(GenomeBuild::GRCh37),
            "grch38" | "hg38" => Ok(GenomeBuild::GRCh38),
            _ => Err(GoaError::InvalidGenomeBuild(s.to_string())),
        }
    }
}

impl std::fmt::Display for GenomeBuild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenomeBuild::GRCh37 => write!(f, "GRCh37"),
            GenomeBuild::GRCh38 => write!(f, "GRCh38"),
        }
    }
}

/// A half-open genomic interval (`chrom:start-end`)
///
/// Start and end are 0-based; `end` is exclusive, matching BED conventions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomicSpan {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl GenomicSpan {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Result<Self, GoaError> {
        let chrom = normalize_chrom(chrom.into());
        if start >= end {
            return Err(GoaError::InvalidSpan(format!(
                "{}:{}-{}: start must be less than end",
                chrom, start, end
            )));
        }
        Ok(Self { chrom, start, end })
    }

    /// Interval length in bases
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

fn normalize_chrom(raw: String) -> String {
    if raw.starts_with("chr") {
        raw
    } else {
        format!("chr{}", raw)
    }
}

impl std::str::FromStr for GenomicSpan {
    type Err = GoaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chrom, range) = s
            .split_once(':')
            .ok_or_else(|| GoaError::InvalidSpan(format!("{}: expected chrom:start-end", s)))?;

        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| GoaError::InvalidSpan(format!("{}: expected chrom:start-end", s)))?;

        let start: u64 = start
            .replace(',', "")
            .parse()
            .map_err(|_| GoaError::InvalidSpan(format!("{}: invalid start position", s)))?;
        let end: u64 = end
            .replace(',', "")
            .parse()
            .map_err(|_| GoaError::InvalidSpan(format!("{}: invalid end position", s)))?;

        GenomicSpan::new(chrom, start, end)
    }
}

impl std::fmt::Display for GenomicSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}
