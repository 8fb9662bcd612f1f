//! Functional-genomics data routes
//!
//! `/data/tracks` fetches interval hits from the FILER repository for a
//! track set over one genomic span. BED export is supported for full
//! content; the track list is carried internally and never echoed back.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use uuid::Uuid;

use goa_common::types::GenomicSpan;

use crate::cache::{CacheNamespace, CacheTtl};
use crate::error::{ApiResult, AppError};
use crate::helpers::{RenderedResponse, RouteHelper};
use crate::response::{PayloadKind, ResponseContent, ResponseFormat};

use crate::features::shared::CommonParams;
use crate::features::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/tracks", get(get_track_data))
}

#[tracing::instrument(skip(state, params))]
async fn get_track_data(
    State(state): State<AppState>,
    Query(params): Query<CommonParams>,
) -> ApiResult<RenderedResponse> {
    let config = params.configuration(
        &ResponseContent::FULL_DATA,
        &ResponseFormat::FUNCTIONAL_GENOMICS,
        PayloadKind::Intervals,
    )?;

    let track = params
        .track
        .as_deref()
        .ok_or_else(|| AppError::Validation("a track list is required".to_string()))?;
    let span = params
        .span
        .as_deref()
        .ok_or_else(|| AppError::Validation("a span is required".to_string()))?;

    // validate the span up front so FILER never sees a malformed one
    span.parse::<GenomicSpan>()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut bag = params.parameters();
    bag.update(
        "_tracks",
        json!(track.split(',').map(str::trim).collect::<Vec<_>>()),
    );

    let helper = RouteHelper::new(
        state.cache.clone(),
        CacheNamespace::Filer,
        config,
        bag,
        "/data/tracks",
        Uuid::new_v4().to_string(),
    )
    .with_ttl(CacheTtl::Short);

    helper.process(&state.filer).await
}
