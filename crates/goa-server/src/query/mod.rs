//! Data-source collaborators behind the route-helper seam
//!
//! Each backing store (track metadata, genomics associations, the FILER
//! functional-genomics repository) implements [`DataSource`], the single
//! contract the route helper orchestrates. Sources shape their payload
//! according to the requested content before returning it, so the helper
//! never inspects rows.

pub mod filer;
pub mod genomics;
pub mod metadata;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::AppError;
use crate::params::Parameters;
use crate::response::{ResponseContent, ResponseData};

/// Errors from a data-source collaborator
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Third-party lookup failed (network error, bad upstream response)
    #[error("lookup failed: {0}")]
    Lookup(String),

    #[error("invalid query parameter: {0}")]
    InvalidParameter(String),
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Database(e) => AppError::Database(e),
            QueryError::Lookup(msg) => AppError::Lookup(msg),
            QueryError::InvalidParameter(msg) => AppError::Validation(msg),
        }
    }
}

/// A backing store the route helper can drive
///
/// `fetch` returns the complete (pre-pagination) result set shaped for
/// `content`; the helper handles caching, pagination, and rendering.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(
        &self,
        params: &Parameters,
        content: ResponseContent,
    ) -> Result<ResponseData, QueryError>;
}
