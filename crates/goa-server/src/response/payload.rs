//! Response payload union and the wrapped response envelope
//!
//! `ResponseData` is the closed set of shapes an endpoint can return;
//! `RecordResponse` wraps one payload together with the request echo,
//! optional pagination metadata, and accumulated messages. Serialization
//! capabilities (`to_text`, `to_bed`, `to_vcf`) either render meaningfully
//! or decline with a `NotImplemented` error; they never return a
//! silently-wrong shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::AppError;
use crate::pagination::PaginationMeta;
use crate::response::records::{
    AssociationRecord, IntervalRecord, RowModel, TrackRecord, VariantRecord,
};

/// Discriminant for [`ResponseData`], carried by the response configuration
/// so cached payloads can be rehydrated into the right variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Tracks,
    Intervals,
    Variants,
    Associations,
    Counts,
    Ids,
    Urls,
}

impl std::fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PayloadKind::Tracks => "tracks",
            PayloadKind::Intervals => "intervals",
            PayloadKind::Variants => "variants",
            PayloadKind::Associations => "associations",
            PayloadKind::Counts => "counts",
            PayloadKind::Ids => "ids",
            PayloadKind::Urls => "urls",
        };
        write!(f, "{}", s)
    }
}

/// The closed union of response payload shapes
///
/// Serializes untagged (a plain record list or count map on the wire);
/// deserialization requires the kind, via [`ResponseData::from_value`],
/// because identifier and URL lists are indistinguishable as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    Tracks(Vec<TrackRecord>),
    Intervals(Vec<IntervalRecord>),
    Variants(Vec<VariantRecord>),
    Associations(Vec<AssociationRecord>),
    Counts(BTreeMap<String, u64>),
    Ids(Vec<String>),
    Urls(Vec<String>),
}

impl ResponseData {
    pub fn kind(&self) -> PayloadKind {
        match self {
            ResponseData::Tracks(_) => PayloadKind::Tracks,
            ResponseData::Intervals(_) => PayloadKind::Intervals,
            ResponseData::Variants(_) => PayloadKind::Variants,
            ResponseData::Associations(_) => PayloadKind::Associations,
            ResponseData::Counts(_) => PayloadKind::Counts,
            ResponseData::Ids(_) => PayloadKind::Ids,
            ResponseData::Urls(_) => PayloadKind::Urls,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResponseData::Tracks(v) => v.len(),
            ResponseData::Intervals(v) => v.len(),
            ResponseData::Variants(v) => v.len(),
            ResponseData::Associations(v) => v.len(),
            ResponseData::Counts(m) => m.len(),
            ResponseData::Ids(v) => v.len(),
            ResponseData::Urls(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Narrow a payload to the given index range (in-memory pagination)
    ///
    /// Count maps are not sliced; they are already summaries.
    pub fn slice(&self, range: std::ops::Range<usize>) -> Self {
        fn take<T: Clone>(items: &[T], range: std::ops::Range<usize>) -> Vec<T> {
            items
                .get(range)
                .map(<[T]>::to_vec)
                .unwrap_or_default()
        }

        match self {
            ResponseData::Tracks(v) => ResponseData::Tracks(take(v, range)),
            ResponseData::Intervals(v) => ResponseData::Intervals(take(v, range)),
            ResponseData::Variants(v) => ResponseData::Variants(take(v, range)),
            ResponseData::Associations(v) => ResponseData::Associations(take(v, range)),
            ResponseData::Counts(m) => ResponseData::Counts(m.clone()),
            ResponseData::Ids(v) => ResponseData::Ids(take(v, range)),
            ResponseData::Urls(v) => ResponseData::Urls(take(v, range)),
        }
    }

    /// Rehydrate a payload of a known kind from its JSON form
    pub fn from_value(kind: PayloadKind, value: Value) -> Result<Self, AppError> {
        let data = match kind {
            PayloadKind::Tracks => ResponseData::Tracks(parse(value)?),
            PayloadKind::Intervals => ResponseData::Intervals(parse(value)?),
            PayloadKind::Variants => ResponseData::Variants(parse(value)?),
            PayloadKind::Associations => ResponseData::Associations(parse(value)?),
            PayloadKind::Counts => ResponseData::Counts(parse(value)?),
            PayloadKind::Ids => ResponseData::Ids(parse(value)?),
            PayloadKind::Urls => ResponseData::Urls(parse(value)?),
        };
        Ok(data)
    }
}

fn parse<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Cache(format!("cached payload is malformed: {}", e)))
}

/// Echo of the originating request, included in every response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEcho {
    pub request_id: String,
    pub endpoint: String,
    pub parameters: Map<String, Value>,
}

/// The wrapped response: payload plus request echo, pagination, and messages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordResponse {
    pub data: ResponseData,
    pub request: RequestEcho,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Vec<String>>,
}

impl RecordResponse {
    pub fn new(data: ResponseData, request: RequestEcho) -> Self {
        Self {
            data,
            request,
            pagination: None,
            message: None,
        }
    }

    pub fn with_pagination(mut self, pagination: PaginationMeta) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_paged(&self) -> bool {
        self.pagination.is_some()
    }

    /// Append a caller-facing message; the first call initializes the list
    pub fn add_message(&mut self, message: impl Into<String>) {
        self.message.get_or_insert_with(Vec::new).push(message.into());
    }

    /// Row-oriented tab-delimited text
    ///
    /// With `include_header`, an empty result still emits the header line
    /// derived from the row model's field list.
    pub fn to_text(
        &self,
        include_header: bool,
        null_placeholder: &str,
    ) -> Result<String, AppError> {
        let (header, rows) = match &self.data {
            ResponseData::Tracks(v) => (text_header::<TrackRecord>(), text_rows(v, null_placeholder)),
            ResponseData::Intervals(v) => {
                (text_header::<IntervalRecord>(), text_rows(v, null_placeholder))
            },
            ResponseData::Variants(v) => {
                (text_header::<VariantRecord>(), text_rows(v, null_placeholder))
            },
            ResponseData::Associations(v) => {
                (text_header::<AssociationRecord>(), text_rows(v, null_placeholder))
            },
            ResponseData::Ids(v) => ("id".to_string(), v.clone()),
            ResponseData::Urls(v) => ("url".to_string(), v.clone()),
            ResponseData::Counts(m) => (
                "category\tcount".to_string(),
                m.iter().map(|(k, v)| format!("{}\t{}", k, v)).collect(),
            ),
        };

        let mut lines = Vec::with_capacity(rows.len() + 1);
        if include_header {
            lines.push(header);
        }
        lines.extend(rows);
        Ok(lines.join("\n"))
    }

    /// Standard tab-delimited BED text; only interval payloads have a
    /// literal BED representation
    pub fn to_bed(&self) -> Result<String, AppError> {
        match &self.data {
            ResponseData::Intervals(v) => Ok(v
                .iter()
                .map(IntervalRecord::to_bed_line)
                .collect::<Vec<_>>()
                .join("\n")),
            other => Err(AppError::NotImplemented(format!(
                "BED export is not available for {} responses",
                other.kind()
            ))),
        }
    }

    /// VCF export is a standing contract gap: declared in the API surface
    /// but declined for every payload shape
    pub fn to_vcf(&self) -> Result<String, AppError> {
        Err(AppError::NotImplemented(format!(
            "VCF export is not yet implemented for {} responses",
            self.data.kind()
        )))
    }

    /// Serialize for the cache store
    pub fn to_cache_value(&self) -> Result<Value, AppError> {
        serde_json::to_value(self)
            .map_err(|e| AppError::Cache(format!("failed to serialize response: {}", e)))
    }

    /// Rehydrate a cached response, given the payload kind from the
    /// response configuration
    pub fn from_cache_value(kind: PayloadKind, value: Value) -> Result<Self, AppError> {
        let Value::Object(mut fields) = value else {
            return Err(AppError::Cache("cached response is not an object".to_string()));
        };

        let data = fields
            .remove("data")
            .ok_or_else(|| AppError::Cache("cached response is missing data".to_string()))?;
        let request = fields
            .remove("request")
            .ok_or_else(|| AppError::Cache("cached response is missing request".to_string()))?;

        Ok(Self {
            data: ResponseData::from_value(kind, data)?,
            request: parse(request)?,
            pagination: fields.remove("pagination").map(parse).transpose()?,
            message: fields.remove("message").map(parse).transpose()?,
        })
    }
}

fn text_header<T: RowModel>() -> String {
    T::fields()
        .iter()
        .map(|f| f.id)
        .collect::<Vec<_>>()
        .join("\t")
}

fn text_rows<T: RowModel>(records: &[T], null_placeholder: &str) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            record
                .values()
                .into_iter()
                .map(|value| value.unwrap_or_else(|| null_placeholder.to_string()))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect()
}
