//! Route-helper lifecycle tests
//!
//! Exercise the full request lifecycle against an in-memory cache and a
//! scripted data source: caching, pagination, slicing, wrapping, and
//! rendering, without a database or HTTP server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use goa_server::cache::memory::MemoryCache;
use goa_server::cache::{CacheNamespace, CacheStore};
use goa_server::error::AppError;
use goa_server::helpers::{RenderedResponse, RouteHelper};
use goa_server::params::Parameters;
use goa_server::query::{DataSource, QueryError};
use goa_server::response::{
    PayloadKind, ResponseConfiguration, ResponseContent, ResponseData, ResponseFormat,
    ResponseView, TrackRecord,
};

/// Scripted source that records how many times it was queried
struct ScriptedSource {
    data: ResponseData,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn tracks(n: usize) -> Self {
        let records = (0..n)
            .map(|i| TrackRecord {
                track_id: format!("NGEN{:05}", i),
                name: format!("Track {}", i),
                description: None,
                genome_build: "GRCh38".to_string(),
                feature_type: Some("enhancer".to_string()),
                data_source: None,
                data_category: None,
                url: None,
            })
            .collect();
        Self {
            data: ResponseData::Tracks(records),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for ScriptedSource {
    async fn fetch(
        &self,
        _params: &Parameters,
        _content: ResponseContent,
    ) -> Result<ResponseData, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.clone())
    }
}

/// Source whose payload shape follows the requested content, like the
/// real queries do
struct ShapedSource {
    full: ResponseData,
    counts: ResponseData,
}

impl ShapedSource {
    fn tracks(n: usize) -> Self {
        let ResponseData::Tracks(records) = ScriptedSource::tracks(n).data else {
            unreachable!();
        };
        let mut counts = std::collections::BTreeMap::new();
        counts.insert("enhancer".to_string(), n as u64);
        Self {
            full: ResponseData::Tracks(records),
            counts: ResponseData::Counts(counts),
        }
    }
}

#[async_trait]
impl DataSource for ShapedSource {
    async fn fetch(
        &self,
        _params: &Parameters,
        content: ResponseContent,
    ) -> Result<ResponseData, QueryError> {
        match content {
            ResponseContent::Counts => Ok(self.counts.clone()),
            _ => Ok(self.full.clone()),
        }
    }
}

fn full_json_config() -> ResponseConfiguration {
    ResponseConfiguration::new(
        ResponseContent::Full,
        ResponseFormat::Json,
        ResponseView::Default,
        PayloadKind::Tracks,
    )
    .unwrap()
}

fn helper(cache: Arc<dyn CacheStore>, params: Parameters) -> RouteHelper {
    RouteHelper::new(
        cache,
        CacheNamespace::Metadata,
        full_json_config(),
        params,
        "/metadata/tracks",
        "req-1",
    )
}

#[tokio::test]
async fn test_small_result_yields_single_page() {
    let cache = Arc::new(MemoryCache::new());
    let source = ScriptedSource::tracks(3);

    let rendered = helper(cache.clone(), Parameters::new())
        .process(&source)
        .await
        .unwrap();

    let RenderedResponse::Json(response) = rendered else {
        panic!("expected JSON rendering");
    };
    let pagination = response.pagination.expect("pagination metadata");
    assert_eq!(pagination.page, 1);
    assert_eq!(pagination.total_num_pages, 1);
    assert_eq!(pagination.paged_num_records, 3);
    assert_eq!(pagination.total_num_records, 3);
}

#[tokio::test]
async fn test_response_is_cached_before_return() {
    let cache = Arc::new(MemoryCache::new());
    let source = ScriptedSource::tracks(3);
    let helper = helper(cache.clone(), Parameters::new());

    helper.process(&source).await.unwrap();

    let key = helper.cache_key();
    let cached = cache
        .get(key.key(), CacheNamespace::Metadata)
        .await
        .unwrap();
    assert!(cached.is_some(), "final response should be cached");
}

#[tokio::test]
async fn test_cache_hit_skips_the_source() {
    let cache = Arc::new(MemoryCache::new());
    let source = ScriptedSource::tracks(3);

    helper(cache.clone(), Parameters::new())
        .process(&source)
        .await
        .unwrap();
    assert_eq!(source.calls(), 1);

    helper(cache.clone(), Parameters::new())
        .process(&source)
        .await
        .unwrap();
    assert_eq!(source.calls(), 1, "second request should be served from cache");
}

#[tokio::test]
async fn test_pages_share_the_raw_payload() {
    let cache = Arc::new(MemoryCache::new());
    let source = ScriptedSource::tracks(12_000);

    let mut page_one = Parameters::new();
    page_one.update("page", json!(1));
    helper(cache.clone(), page_one).process(&source).await.unwrap();

    let mut page_two = Parameters::new();
    page_two.update("page", json!(2));
    let rendered = helper(cache.clone(), page_two)
        .process(&source)
        .await
        .unwrap();

    assert_eq!(source.calls(), 1, "page 2 should reuse the raw cache entry");

    let RenderedResponse::Json(response) = rendered else {
        panic!("expected JSON rendering");
    };
    let pagination = response.pagination.unwrap();
    assert_eq!(pagination.page, 2);
    assert_eq!(pagination.total_num_pages, 3);
    assert_eq!(pagination.paged_num_records, 5000);
    assert_eq!(pagination.total_num_records, 12_000);
}

#[tokio::test]
async fn test_page_beyond_last_is_rejected() {
    let cache = Arc::new(MemoryCache::new());
    let source = ScriptedSource::tracks(3);

    let mut params = Parameters::new();
    params.update("page", json!(2));
    let err = helper(cache, params).process(&source).await.unwrap_err();

    let AppError::Validation(message) = err else {
        panic!("expected a validation error, got {:?}", err);
    };
    assert!(message.contains("page 2"), "message was: {}", message);
    assert!(message.contains("maximum of 1 pages"), "message was: {}", message);
}

#[tokio::test]
async fn test_oversized_result_is_rejected() {
    let cache = Arc::new(MemoryCache::new());
    let source = ScriptedSource::tracks(50_001);

    let err = helper(cache, Parameters::new())
        .process(&source)
        .await
        .unwrap_err();

    let AppError::Validation(message) = err else {
        panic!("expected a validation error, got {:?}", err);
    };
    assert!(message.contains("narrow your query"), "message was: {}", message);
}

#[tokio::test]
async fn test_empty_result_carries_a_message() {
    let cache = Arc::new(MemoryCache::new());
    let source = ScriptedSource::tracks(0);

    let rendered = helper(cache, Parameters::new())
        .process(&source)
        .await
        .unwrap();

    let RenderedResponse::Json(response) = rendered else {
        panic!("expected JSON rendering");
    };
    assert!(response.is_empty());
    let messages = response.message.expect("empty responses carry a message");
    assert!(messages.iter().any(|m| m.contains("no records")));
}

#[tokio::test]
async fn test_cache_key_ignores_rendering_parameters() {
    let cache = Arc::new(MemoryCache::new());

    let mut with_format = Parameters::new();
    with_format.set_str("keyword", "enhancer");
    with_format.set_str("format", "text");

    let mut without_format = Parameters::new();
    without_format.set_str("keyword", "enhancer");

    let a = helper(cache.clone(), with_format).cache_key();
    let b = helper(cache.clone(), without_format).cache_key();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_cache_key_separates_content_shapes() {
    let cache = Arc::new(MemoryCache::new());
    let source = ShapedSource::tracks(3);

    let mut params = Parameters::new();
    params.set_str("keyword", "enhancer");

    let full = helper(cache.clone(), params.clone());
    full.process(&source).await.unwrap();

    // same request parameters, counts shape: must not collide with the
    // cached full payload
    let counts_config = ResponseConfiguration::new(
        ResponseContent::Counts,
        ResponseFormat::Json,
        ResponseView::Default,
        PayloadKind::Counts,
    )
    .unwrap();
    let counts = RouteHelper::new(
        cache.clone(),
        CacheNamespace::Metadata,
        counts_config,
        params,
        "/metadata/tracks",
        "req-2",
    );
    assert_ne!(full.cache_key(), counts.cache_key());

    let rendered = counts.process(&source).await.unwrap();
    let RenderedResponse::Json(response) = rendered else {
        panic!("expected JSON rendering");
    };
    let ResponseData::Counts(map) = &response.data else {
        panic!("expected a counts payload, got {:?}", response.data);
    };
    assert_eq!(map.get("enhancer"), Some(&3));
}

#[tokio::test]
async fn test_text_rendering() {
    let cache = Arc::new(MemoryCache::new());
    let source = ScriptedSource::tracks(2);

    let config = ResponseConfiguration::new(
        ResponseContent::Full,
        ResponseFormat::Text,
        ResponseView::Default,
        PayloadKind::Tracks,
    )
    .unwrap();
    let helper = RouteHelper::new(
        cache,
        CacheNamespace::Metadata,
        config,
        Parameters::new(),
        "/metadata/tracks",
        "req-1",
    );

    let rendered = helper.process(&source).await.unwrap();
    let RenderedResponse::Text(body) = rendered else {
        panic!("expected text rendering");
    };
    let mut lines = body.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("track_id\t"));
    assert_eq!(lines.count(), 2);
}

#[tokio::test]
async fn test_bed_decline_degrades_to_json_with_warning() {
    let cache = Arc::new(MemoryCache::new());
    // track records have no BED shape
    let source = ScriptedSource::tracks(1);

    let config = ResponseConfiguration::new(
        ResponseContent::Full,
        ResponseFormat::Bed,
        ResponseView::Default,
        PayloadKind::Tracks,
    )
    .unwrap();
    let helper = RouteHelper::new(
        cache,
        CacheNamespace::Metadata,
        config,
        Parameters::new(),
        "/metadata/tracks",
        "req-1",
    );

    let rendered = helper.process(&source).await.unwrap();
    let RenderedResponse::Json(response) = rendered else {
        panic!("expected degraded JSON rendering");
    };
    assert!(response.message.is_some(), "degrade should carry a warning");
}

#[tokio::test]
async fn test_table_view_renders_and_caches() {
    let cache = Arc::new(MemoryCache::new());
    let source = ScriptedSource::tracks(2);

    let config = ResponseConfiguration::new(
        ResponseContent::Full,
        ResponseFormat::Json,
        ResponseView::Table,
        PayloadKind::Tracks,
    )
    .unwrap();
    let helper = RouteHelper::new(
        cache.clone(),
        CacheNamespace::Metadata,
        config,
        Parameters::new(),
        "/metadata/tracks",
        "req-1",
    );

    let rendered = helper.process(&source).await.unwrap();
    let RenderedResponse::Table(table) = rendered else {
        panic!("expected table rendering");
    };
    assert_eq!(table.data.len(), 2);
    assert!(!table.columns.is_empty());

    let view_key = helper.cache_key().qualify("view_table");
    let cached = cache.get(&view_key, CacheNamespace::View).await.unwrap();
    assert!(cached.is_some(), "table rendering should be cached");
}
