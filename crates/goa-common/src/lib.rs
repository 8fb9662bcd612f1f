//! GOA Common Library
//!
//! Shared types, utilities, and error handling for the GOA open-access API
//! workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across GOA workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Centralized tracing configuration and initialization
//! - **Types**: Shared genomics domain types (spans, genome builds)
//!
//! # Example
//!
//! ```no_run
//! use goa_common::Result;
//! use goa_common::types::GenomicSpan;
//!
//! fn parse_region(raw: &str) -> Result<GenomicSpan> {
//!     let span: GenomicSpan = raw.parse()?;
//!     Ok(span)
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{GoaError, Result};
