//! Genomics routes
//!
//! `/genomics/associations` reports variant-trait associations over a
//! span or track set, defaulting to genome-wide significance; scores
//! can export as VCF for full content. `/genomics/variants/:id` looks
//! up variants by id or refSNP id.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use uuid::Uuid;

use crate::cache::CacheNamespace;
use crate::error::ApiResult;
use crate::helpers::{RenderedResponse, RouteHelper};
use crate::query::genomics::{AssociationQuery, VariantQuery};
use crate::response::{PayloadKind, ResponseContent, ResponseFormat};

use crate::features::shared::CommonParams;
use crate::features::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/associations", get(list_associations))
        .route("/variants/:id", get(get_variants))
}

#[tracing::instrument(skip(state, params))]
async fn list_associations(
    State(state): State<AppState>,
    Query(params): Query<CommonParams>,
) -> ApiResult<RenderedResponse> {
    let config = params.configuration(
        &ResponseContent::DATA,
        &ResponseFormat::VARIANT_SCORE,
        PayloadKind::Associations,
    )?;

    let helper = RouteHelper::new(
        state.cache.clone(),
        CacheNamespace::Genomics,
        config,
        params.parameters(),
        "/genomics/associations",
        Uuid::new_v4().to_string(),
    );

    helper
        .process(&AssociationQuery::new(state.db.clone()))
        .await
}

#[tracing::instrument(skip(state, params), fields(id = %id))]
async fn get_variants(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CommonParams>,
) -> ApiResult<RenderedResponse> {
    let config = params.configuration(
        &ResponseContent::FULL_DATA,
        &ResponseFormat::VARIANT_SCORE,
        PayloadKind::Variants,
    )?;

    let mut bag = params.parameters();
    bag.update(
        "id",
        json!(id.split(',').map(str::trim).collect::<Vec<_>>()),
    );

    let helper = RouteHelper::new(
        state.cache.clone(),
        CacheNamespace::Genomics,
        config,
        bag,
        "/genomics/variants/record",
        Uuid::new_v4().to_string(),
    );

    helper.process(&VariantQuery::new(state.db.clone())).await
}
