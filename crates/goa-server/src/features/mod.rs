//! Feature slices: one module per endpoint group
//!
//! Each slice owns its routes, narrows the shared shaping parameters
//! through its own content/format subsets, and drives its data source
//! through a route helper.

pub mod associations;
pub mod data;
pub mod shared;
pub mod tracks;

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use crate::cache::CacheStore;
use crate::query::filer::FilerClient;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: Arc<dyn CacheStore>,
    pub filer: FilerClient,
}

impl AppState {
    pub fn new(db: PgPool, cache: Arc<dyn CacheStore>, filer: FilerClient) -> Self {
        Self { db, cache, filer }
    }
}

/// Assemble all feature routers under their path prefixes
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/metadata", tracks::routes())
        .nest("/genomics", associations::routes())
        .nest("/data", data::routes())
}
