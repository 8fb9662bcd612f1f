//! Shared request-parameter handling for the feature slices
//!
//! Every endpoint accepts the same response-shaping parameters; each
//! slice narrows them through its own allowed subsets before the
//! cross-field rules run. Domain parameters collected here land in the
//! [`Parameters`] bag that drives caching and querying.

use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::params::Parameters;
use crate::response::{
    ContentSubset, FormatSubset, PayloadKind, ResponseConfiguration, ResponseContent,
    ResponseView,
};

/// Query-string parameters common to every endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommonParams {
    pub content: Option<String>,
    pub format: Option<String>,
    pub view: Option<String>,
    pub page: Option<usize>,
    pub filter: Option<String>,
    pub keyword: Option<String>,
    pub assembly: Option<String>,
    pub track: Option<String>,
    pub span: Option<String>,
    pub pvalue: Option<String>,
}

impl CommonParams {
    /// Narrow the shaping parameters through the slice's subsets and
    /// build the validated response configuration
    pub fn configuration(
        &self,
        contents: &ContentSubset,
        formats: &FormatSubset,
        base_kind: PayloadKind,
    ) -> Result<ResponseConfiguration, AppError> {
        let content = match &self.content {
            Some(raw) => contents.validate(raw)?,
            None => ResponseContent::Full,
        };
        let format = match &self.format {
            Some(raw) => formats.validate(raw)?,
            None => crate::response::ResponseFormat::Json,
        };
        let view = match &self.view {
            Some(raw) => ResponseView::validate_table(raw)?,
            None => ResponseView::Default,
        };

        ResponseConfiguration::new(content, format, view, payload_kind(base_kind, content))
    }

    /// Collect the domain parameters into the bag that drives caching
    /// and querying
    pub fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        if let Some(page) = self.page {
            params.update("page", json!(page));
        }
        if let Some(keyword) = &self.keyword {
            params.set_str("keyword", keyword);
        }
        if let Some(assembly) = &self.assembly {
            params.set_str("assembly", assembly);
        }
        if let Some(track) = &self.track {
            params.set_str("track", track);
        }
        if let Some(span) = &self.span {
            params.set_str("span", span);
        }
        if let Some(pvalue) = &self.pvalue {
            params.set_str("pvalue", pvalue);
        }
        if let Some(filter) = &self.filter {
            params.set_str("filter", filter);
            params.update("filter_tokens", json!(tokenize_filter(filter)));
        }
        params
    }

    /// Some endpoints refuse to run unconstrained
    pub fn require_filter_or_keyword(&self) -> Result<(), AppError> {
        if self.filter.is_none() && self.keyword.is_none() {
            return Err(AppError::Validation(
                "either a filter or a keyword is required for this query".to_string(),
            ));
        }
        Ok(())
    }
}

/// Identifier, count, and URL payloads keep their own shape regardless of
/// the endpoint's record type
pub fn payload_kind(base: PayloadKind, content: ResponseContent) -> PayloadKind {
    match content {
        ResponseContent::Ids => PayloadKind::Ids,
        ResponseContent::Counts => PayloadKind::Counts,
        ResponseContent::Urls => PayloadKind::Urls,
        ResponseContent::Full | ResponseContent::Summary => base,
    }
}

/// Split a raw filter expression into normalized tokens
///
/// Tokens are lowercased and deduplicated (first occurrence wins, order
/// preserved); quoting is not supported.
pub fn tokenize_filter(raw: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '_').to_lowercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
