//! Response configuration: content, format, and view enumerations
//!
//! Closed sets of allowed values for "what data", "what wire format", and
//! "what visual shape", plus named narrowing subsets used for per-endpoint
//! validation. Endpoint-level narrowing happens before construction by
//! calling a subset's `validate`; `ResponseConfiguration::new` then enforces
//! the cross-field invariants on the already-validated triple.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::response::payload::PayloadKind;

/// What data an endpoint returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseContent {
    /// Complete records
    Full,
    /// Count summaries only
    Counts,
    /// Identifiers only
    Ids,
    /// Abbreviated records
    Summary,
    /// Data-access URLs only
    Urls,
}

impl ResponseContent {
    const ALL: &'static [ResponseContent] = &[
        ResponseContent::Full,
        ResponseContent::Counts,
        ResponseContent::Ids,
        ResponseContent::Summary,
        ResponseContent::Urls,
    ];

    /// Descriptive responses: summarize rather than enumerate
    pub const DESCRIPTIVE: ContentSubset = ContentSubset {
        name: "descriptive",
        members: &[ResponseContent::Summary, ResponseContent::Counts],
    };

    /// Data responses: record-bearing contents (identifier and URL lists
    /// are rejected)
    pub const DATA: ContentSubset = ContentSubset {
        name: "data",
        members: &[
            ResponseContent::Full,
            ResponseContent::Summary,
            ResponseContent::Counts,
        ],
    };

    /// Full-data responses: complete records or their counts
    pub const FULL_DATA: ContentSubset = ContentSubset {
        name: "full_data",
        members: &[ResponseContent::Full, ResponseContent::Counts],
    };

    /// The unrestricted subset (every enum member)
    pub const ANY: ContentSubset = ContentSubset {
        name: "content",
        members: Self::ALL,
    };
}

impl std::str::FromStr for ResponseContent {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(ResponseContent::Full),
            "counts" => Ok(ResponseContent::Counts),
            "ids" => Ok(ResponseContent::Ids),
            "summary" | "brief" => Ok(ResponseContent::Summary),
            "urls" => Ok(ResponseContent::Urls),
            _ => Err(AppError::Validation(format!(
                "invalid content: {}; expected one of full, counts, ids, summary, urls",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ResponseContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResponseContent::Full => "full",
            ResponseContent::Counts => "counts",
            ResponseContent::Ids => "ids",
            ResponseContent::Summary => "summary",
            ResponseContent::Urls => "urls",
        };
        write!(f, "{}", s)
    }
}

/// A named narrowing of [`ResponseContent`]
///
/// Always a subset of the full enum: a value accepted by a subset is always
/// a member of the enum, but not the reverse.
#[derive(Debug, Clone, Copy)]
pub struct ContentSubset {
    name: &'static str,
    members: &'static [ResponseContent],
}

impl ContentSubset {
    pub fn contains(&self, content: ResponseContent) -> bool {
        self.members.contains(&content)
    }

    /// Validate a raw string against this subset, not the full enum
    pub fn validate(&self, raw: &str) -> Result<ResponseContent, AppError> {
        let content: ResponseContent = raw.parse()?;
        if self.contains(content) {
            Ok(content)
        } else {
            Err(AppError::Validation(format!(
                "content '{}' is not allowed here; expected one of: {}",
                content,
                self.member_list()
            )))
        }
    }

    fn member_list(&self) -> String {
        self.members
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Wire format of the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Json,
    Text,
    Vcf,
    Bed,
}

impl ResponseFormat {
    /// Formats every endpoint supports
    pub const GENERIC: FormatSubset = FormatSubset {
        name: "generic",
        members: &[ResponseFormat::Json, ResponseFormat::Text],
    };

    /// Formats for functional-genomics interval endpoints
    pub const FUNCTIONAL_GENOMICS: FormatSubset = FormatSubset {
        name: "functional_genomics",
        members: &[ResponseFormat::Json, ResponseFormat::Text, ResponseFormat::Bed],
    };

    /// Formats for variant-association endpoints
    pub const VARIANT_SCORE: FormatSubset = FormatSubset {
        name: "variant_score",
        members: &[ResponseFormat::Json, ResponseFormat::Text, ResponseFormat::Vcf],
    };
}

impl std::str::FromStr for ResponseFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "text" => Ok(ResponseFormat::Text),
            "vcf" => Ok(ResponseFormat::Vcf),
            "bed" => Ok(ResponseFormat::Bed),
            _ => Err(AppError::Validation(format!(
                "invalid format: {}; expected one of json, text, vcf, bed",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Text => "text",
            ResponseFormat::Vcf => "vcf",
            ResponseFormat::Bed => "bed",
        };
        write!(f, "{}", s)
    }
}

/// A named narrowing of [`ResponseFormat`]
#[derive(Debug, Clone, Copy)]
pub struct FormatSubset {
    name: &'static str,
    members: &'static [ResponseFormat],
}

impl FormatSubset {
    pub fn contains(&self, format: ResponseFormat) -> bool {
        self.members.contains(&format)
    }

    pub fn validate(&self, raw: &str) -> Result<ResponseFormat, AppError> {
        let format: ResponseFormat = raw.parse()?;
        if self.contains(format) {
            Ok(format)
        } else {
            Err(AppError::Validation(format!(
                "format '{}' is not allowed here; expected one of: {}",
                format,
                self.members
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )))
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Visual shape of the rendered response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseView {
    Default,
    Table,
    IgvBrowser,
}

impl ResponseView {
    /// Views for tabular endpoints (excludes the genome browser)
    pub const TABLE: &'static [ResponseView] = &[ResponseView::Default, ResponseView::Table];

    /// Validate against the tabular subset
    pub fn validate_table(raw: &str) -> Result<ResponseView, AppError> {
        let view: ResponseView = raw.parse()?;
        if Self::TABLE.contains(&view) {
            Ok(view)
        } else {
            Err(AppError::Validation(format!(
                "view '{}' is not allowed here; expected one of: default, table",
                view
            )))
        }
    }
}

impl std::str::FromStr for ResponseView {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(ResponseView::Default),
            "table" => Ok(ResponseView::Table),
            "igv_browser" | "igv" => Ok(ResponseView::IgvBrowser),
            _ => Err(AppError::Validation(format!(
                "invalid view: {}; expected one of default, table, igv_browser",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ResponseView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResponseView::Default => "default",
            ResponseView::Table => "table",
            ResponseView::IgvBrowser => "igv_browser",
        };
        write!(f, "{}", s)
    }
}

/// Validated, frozen (content, format, view, payload-kind) tuple for one
/// request
///
/// Constructed once per request from subset-validated query parameters and
/// immutable thereafter. The payload kind binds the concrete response shape
/// the endpoint produces, so render dispatch is a closed match rather than
/// dynamic serializer selection.
#[derive(Debug, Clone, Copy)]
pub struct ResponseConfiguration {
    content: ResponseContent,
    format: ResponseFormat,
    view: ResponseView,
    kind: PayloadKind,
}

impl ResponseConfiguration {
    /// Validate the cross-field rules and freeze the configuration
    ///
    /// # Errors
    ///
    /// - a non-default view with content other than FULL or SUMMARY
    /// - VCF or BED format with content other than FULL
    pub fn new(
        content: ResponseContent,
        format: ResponseFormat,
        view: ResponseView,
        kind: PayloadKind,
    ) -> Result<Self, AppError> {
        if view != ResponseView::Default
            && !matches!(content, ResponseContent::Full | ResponseContent::Summary)
        {
            return Err(AppError::Validation(format!(
                "view '{}' requires content to be one of: full, summary (got '{}')",
                view, content
            )));
        }

        if content != ResponseContent::Full
            && matches!(format, ResponseFormat::Vcf | ResponseFormat::Bed)
        {
            return Err(AppError::Validation(format!(
                "format '{}' requires content to be 'full' (got '{}')",
                format, content
            )));
        }

        Ok(Self {
            content,
            format,
            view,
            kind,
        })
    }

    pub fn content(&self) -> ResponseContent {
        self.content
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn view(&self) -> ResponseView {
        self.view
    }

    pub fn kind(&self) -> PayloadKind {
        self.kind
    }
}
