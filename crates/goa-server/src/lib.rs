//! GOA server: open-access genomics APIs
//!
//! The server exposes track metadata, variant-trait association, and
//! functional-genomics data endpoints. All endpoints share one response
//! pipeline: a validated response configuration, a cache-first route
//! helper, canonical pagination, and a polymorphic rendering layer
//! (JSON, tab-delimited text, BED, and tabular views).

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod features;
pub mod helpers;
pub mod pagination;
pub mod params;
pub mod query;
pub mod response;
