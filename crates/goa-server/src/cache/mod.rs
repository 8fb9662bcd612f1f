//! Cache-key derivation and the cache-store contract
//!
//! Cache identity is derived from the request path plus its sorted query
//! parameters with `format` and `view` stripped, so JSON, TEXT, and TABLE
//! renderings of the same underlying query share one cached data payload.
//! The raw key is passed through SHA-256 to produce a fixed-length opaque
//! store key. Qualifiers create addresses derived from, but distinct from,
//! the base key (raw pre-pagination entries, per-view rendered entries);
//! they are separate cache rows, expiring independently via TTL. No explicit
//! invalidation exists in this layer.

pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;

use crate::error::AppError;
use crate::params::Parameters;

/// Keys always stripped before hashing: rendering choices never change the
/// underlying data payload.
const RENDERING_KEYS: &[&str] = &["format", "view"];

/// Cache namespaces partition entries by service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    Metadata,
    Genomics,
    Filer,
    View,
}

impl std::fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CacheNamespace::Metadata => "metadata",
            CacheNamespace::Genomics => "genomics",
            CacheNamespace::Filer => "filer",
            CacheNamespace::View => "view",
        };
        write!(f, "{}", s)
    }
}

/// Closed set of entry lifetimes; the core never invents new TTL values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheTtl {
    /// ~5 minutes, for view renderings
    Short,
    /// ~1 hour
    #[default]
    Default,
    /// ~24 hours, for stable metadata
    Long,
}

impl CacheTtl {
    pub fn duration(&self) -> Duration {
        match self {
            CacheTtl::Short => Duration::from_secs(300),
            CacheTtl::Default => Duration::from_secs(3600),
            CacheTtl::Long => Duration::from_secs(86_400),
        }
    }
}

/// Deterministic cache identity for one logical query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    raw: String,
    hashed: String,
}

impl CacheKey {
    /// Derive the base key from the request endpoint and parameter bag
    ///
    /// `extra_exclude` names additional parameters to strip beyond
    /// `format`/`view` (route helpers strip `page` so all pages of one
    /// logical query share the cached payload).
    pub fn from_request(endpoint: &str, params: &Parameters, extra_exclude: &[&str]) -> Self {
        let mut exclude: Vec<&str> = RENDERING_KEYS.to_vec();
        exclude.extend_from_slice(extra_exclude);

        let raw = format!("{}?{}", endpoint, params.query_fragment(&exclude));
        let hashed = hash(&raw);
        Self { raw, hashed }
    }

    /// The human-readable key material (for logging)
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The opaque store key
    pub fn key(&self) -> &str {
        &self.hashed
    }

    /// A derived address for an entry layered on top of the base key
    pub fn qualify(&self, qualifier: &str) -> String {
        format!("{}_{}", self.hashed, qualifier)
    }
}

fn hash(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Errors from the cache store
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store unavailable: {0}")]
    Unavailable(String),

    #[error("cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<CacheError> for AppError {
    fn from(err: CacheError) -> Self {
        AppError::Cache(err.to_string())
    }
}

/// Contract for the shared cache store
///
/// Implementations must make `get`/`set` individually atomic; this layer
/// adds no cross-call locking, so two concurrent misses for one key may
/// both populate it.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str, namespace: CacheNamespace)
        -> Result<Option<Value>, CacheError>;

    async fn set(
        &self,
        key: &str,
        value: Value,
        ttl: CacheTtl,
        namespace: CacheNamespace,
    ) -> Result<(), CacheError>;

    async fn exists(&self, key: &str, namespace: CacheNamespace) -> Result<bool, CacheError>;
}
