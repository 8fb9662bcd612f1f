//! Functional-genomics data endpoints backed by FILER

pub mod routes;

pub use routes::routes;
