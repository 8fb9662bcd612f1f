//! Track metadata routes
//!
//! `/metadata/tracks` lists tracks matching a keyword or filter;
//! `/metadata/tracks/:id` resolves one or more track identifiers.
//! Both serve generic formats only (JSON/TEXT); BED and VCF belong to
//! the data endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use uuid::Uuid;

use crate::cache::CacheNamespace;
use crate::error::ApiResult;
use crate::helpers::{RenderedResponse, RouteHelper};
use crate::query::metadata::TrackMetadataQuery;
use crate::response::{PayloadKind, ResponseContent, ResponseFormat};

use crate::features::shared::CommonParams;
use crate::features::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tracks", get(list_tracks))
        .route("/tracks/:id", get(get_tracks))
}

#[tracing::instrument(skip(state, params))]
async fn list_tracks(
    State(state): State<AppState>,
    Query(params): Query<CommonParams>,
) -> ApiResult<RenderedResponse> {
    params.require_filter_or_keyword()?;

    let config = params.configuration(
        &ResponseContent::ANY,
        &ResponseFormat::GENERIC,
        PayloadKind::Tracks,
    )?;

    let helper = RouteHelper::new(
        state.cache.clone(),
        CacheNamespace::Metadata,
        config,
        params.parameters(),
        "/metadata/tracks",
        Uuid::new_v4().to_string(),
    );

    helper
        .process(&TrackMetadataQuery::new(state.db.clone()))
        .await
}

#[tracing::instrument(skip(state, params), fields(id = %id))]
async fn get_tracks(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CommonParams>,
) -> ApiResult<RenderedResponse> {
    let config = params.configuration(
        &ResponseContent::FULL_DATA,
        &ResponseFormat::GENERIC,
        PayloadKind::Tracks,
    )?;

    let mut bag = params.parameters();
    bag.update(
        "track",
        serde_json::json!(id.split(',').map(str::trim).collect::<Vec<_>>()),
    );

    let helper = RouteHelper::new(
        state.cache.clone(),
        CacheNamespace::Metadata,
        config,
        bag,
        "/metadata/tracks/record",
        Uuid::new_v4().to_string(),
    );

    helper
        .process(&TrackMetadataQuery::new(state.db.clone()))
        .await
}
