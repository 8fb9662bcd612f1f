//! Response rendering
//!
//! Turns a wrapped response into its final shape per the response
//! configuration. Unsupported export formats degrade gracefully: the
//! response falls back to JSON with a warning message instead of
//! failing the request, since the data itself is valid.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::{ApiResult, AppError};
use crate::response::{RecordResponse, ResponseFormat, ResponseView, TableView};

use super::RouteHelper;

/// Qualifier for cached table renderings
const TABLE_QUALIFIER: &str = "view_table";

/// A fully rendered response, ready to serve
#[derive(Debug)]
pub enum RenderedResponse {
    Json(RecordResponse),
    Text(String),
    Bed(String),
    Vcf(String),
    Table(TableView),
}

impl IntoResponse for RenderedResponse {
    fn into_response(self) -> Response {
        match self {
            RenderedResponse::Json(response) => Json(response).into_response(),
            RenderedResponse::Table(table) => Json(table).into_response(),
            RenderedResponse::Text(body)
            | RenderedResponse::Bed(body)
            | RenderedResponse::Vcf(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                body,
            )
                .into_response(),
        }
    }
}

/// Render `response` per the helper's response configuration
pub(crate) async fn render(
    helper: &RouteHelper,
    response: RecordResponse,
) -> ApiResult<RenderedResponse> {
    match helper.config().view() {
        ResponseView::Table => return render_table(helper, response).await,
        ResponseView::IgvBrowser => {
            return Err(AppError::NotImplemented(
                "the IGV browser view is coming soon".to_string(),
            ));
        }
        ResponseView::Default => {}
    }

    match helper.config().format() {
        ResponseFormat::Json => Ok(RenderedResponse::Json(response)),
        ResponseFormat::Text => match response.to_text(true, "NA") {
            Ok(body) => Ok(RenderedResponse::Text(body)),
            Err(AppError::NotImplemented(reason)) => Ok(degrade(response, reason)),
            Err(e) => Err(e),
        },
        ResponseFormat::Bed => match response.to_bed() {
            Ok(body) => Ok(RenderedResponse::Bed(body)),
            Err(AppError::NotImplemented(reason)) => Ok(degrade(response, reason)),
            Err(e) => Err(e),
        },
        ResponseFormat::Vcf => match response.to_vcf() {
            Ok(body) => Ok(RenderedResponse::Vcf(body)),
            Err(AppError::NotImplemented(reason)) => Ok(degrade(response, reason)),
            Err(e) => Err(e),
        },
    }
}

/// Fall back to JSON, carrying the decline reason as a warning
fn degrade(mut response: RecordResponse, reason: String) -> RenderedResponse {
    tracing::warn!(%reason, "export format unavailable; falling back to JSON");
    response.add_message(reason);
    RenderedResponse::Json(response)
}

async fn render_table(
    helper: &RouteHelper,
    response: RecordResponse,
) -> ApiResult<RenderedResponse> {
    if let Some(cached) = helper.cached_view(TABLE_QUALIFIER).await? {
        let table: TableView = serde_json::from_value(cached)
            .map_err(|e| AppError::Cache(format!("malformed cached table: {}", e)))?;
        return Ok(RenderedResponse::Table(table));
    }

    match TableView::from_response(
        &response,
        Some(helper.config().kind().to_string()),
        None,
    ) {
        Ok(table) => {
            helper
                .cache_view(TABLE_QUALIFIER, serde_json::to_value(&table).map_err(
                    |e| AppError::Cache(format!("failed to serialize table: {}", e)),
                )?)
                .await?;
            Ok(RenderedResponse::Table(table))
        }
        Err(AppError::NotImplemented(reason)) => Ok(degrade(response, reason)),
        Err(e) => Err(e),
    }
}
