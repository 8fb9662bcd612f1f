//! Route-helper orchestration
//!
//! One `RouteHelper` instance serves one request: it derives the cache
//! identity, consults the cache (final wrapped response first, then the
//! raw pre-pagination payload), drives the data source on a full miss,
//! paginates and slices, wraps the page in the response envelope, and
//! hands the result to the renderer. Handlers construct the helper,
//! call [`RouteHelper::process`], and return the rendered response.

pub mod render;

use std::sync::Arc;

use serde_json::json;

use crate::cache::{CacheKey, CacheNamespace, CacheStore, CacheTtl};
use crate::error::{ApiResult, AppError};
use crate::pagination::Pagination;
use crate::params::Parameters;
use crate::query::DataSource;
use crate::response::{RecordResponse, RequestEcho, ResponseConfiguration, ResponseData};

pub use render::RenderedResponse;

/// Qualifier for the raw (pre-pagination) cache entry
const RAW_QUALIFIER: &str = "raw";

/// Per-request orchestration state
pub struct RouteHelper {
    cache: Arc<dyn CacheStore>,
    namespace: CacheNamespace,
    config: ResponseConfiguration,
    params: Parameters,
    endpoint: String,
    request_id: String,
    page_size: usize,
    ttl: CacheTtl,
}

impl RouteHelper {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        namespace: CacheNamespace,
        config: ResponseConfiguration,
        params: Parameters,
        endpoint: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            namespace,
            config,
            params,
            endpoint: endpoint.into(),
            request_id: request_id.into(),
            page_size: crate::pagination::DEFAULT_PAGE_SIZE,
            ttl: CacheTtl::Default,
        }
    }

    /// Override the page size (FILER responses page at smaller sizes)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_ttl(mut self, ttl: CacheTtl) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn config(&self) -> &ResponseConfiguration {
        &self.config
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Parameter bag used for key derivation: the request parameters plus
    /// the canonical content value, so payloads of different shapes never
    /// share a cache entry (the raw `content` string may be absent or an
    /// alias; the validated enum is what identifies the data)
    fn keyed_params(&self) -> Parameters {
        let mut params = self.params.clone();
        params.update("content", json!(self.config.content().to_string()));
        params
    }

    /// Cache identity for the final wrapped response of this page
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::from_request(&self.endpoint, &self.keyed_params(), &[])
    }

    /// Cache identity shared by all pages of this logical query
    fn raw_cache_key(&self) -> CacheKey {
        CacheKey::from_request(&self.endpoint, &self.keyed_params(), &["page"])
    }

    fn requested_page(&self) -> Result<usize, AppError> {
        match self.params.get("page") {
            None => Ok(1),
            Some(v) => v
                .as_u64()
                .map(|p| p as usize)
                .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
                .ok_or_else(|| {
                    AppError::Validation(format!("invalid page number: {}", v))
                }),
        }
    }

    fn echo(&self) -> RequestEcho {
        RequestEcho {
            request_id: self.request_id.clone(),
            endpoint: self.endpoint.clone(),
            parameters: self.params.echo(),
        }
    }

    /// Run the full request lifecycle and render the result
    ///
    /// Lifecycle: cached final response, else cached raw payload, else
    /// `source.fetch`; then paginate, slice, wrap, cache the final
    /// response, and render per the response configuration.
    #[tracing::instrument(skip(self, source), fields(endpoint = %self.endpoint))]
    pub async fn process(&self, source: &dyn DataSource) -> ApiResult<RenderedResponse> {
        let response = self.resolve_response(source).await?;
        render::render(self, response).await
    }

    /// Produce the wrapped, paginated response for this request
    pub(crate) async fn resolve_response(
        &self,
        source: &dyn DataSource,
    ) -> ApiResult<RecordResponse> {
        let key = self.cache_key();

        if let Some(cached) = self.cache.get(key.key(), self.namespace).await? {
            tracing::debug!(key = %key.raw(), "response cache hit");
            return RecordResponse::from_cache_value(self.config.kind(), cached);
        }

        let data = self.resolve_data(source).await?;

        let page = self.requested_page()?;
        let pagination = Pagination::with_page_size(page, data.len(), self.page_size)?;
        let paged = data.slice(pagination.slice());
        let meta = pagination.meta(paged.len());

        let mut response = RecordResponse::new(paged, self.echo()).with_pagination(meta);
        if response.is_empty() {
            response.add_message("no records match this query");
        }

        self.cache
            .set(key.key(), response.to_cache_value()?, self.ttl, self.namespace)
            .await?;

        Ok(response)
    }

    /// Fetch the complete result set, via the raw cache entry when possible
    async fn resolve_data(&self, source: &dyn DataSource) -> ApiResult<ResponseData> {
        let raw_key = self.raw_cache_key().qualify(RAW_QUALIFIER);

        if let Some(cached) = self.cache.get(&raw_key, self.namespace).await? {
            tracing::debug!(key = %raw_key, "raw payload cache hit");
            return ResponseData::from_value(self.config.kind(), cached);
        }

        let data = source
            .fetch(&self.params, self.config.content())
            .await
            .map_err(AppError::from)?;

        self.cache
            .set(&raw_key, json!(data), self.ttl, self.namespace)
            .await?;

        Ok(data)
    }

    /// Cache a rendered view entry (short TTL, shared view namespace)
    pub(crate) async fn cache_view(
        &self,
        qualifier: &str,
        value: serde_json::Value,
    ) -> Result<(), AppError> {
        let key = self.cache_key().qualify(qualifier);
        self.cache
            .set(&key, value, CacheTtl::Short, CacheNamespace::View)
            .await?;
        Ok(())
    }

    pub(crate) async fn cached_view(
        &self,
        qualifier: &str,
    ) -> Result<Option<serde_json::Value>, AppError> {
        let key = self.cache_key().qualify(qualifier);
        Ok(self.cache.get(&key, CacheNamespace::View).await?)
    }
}
