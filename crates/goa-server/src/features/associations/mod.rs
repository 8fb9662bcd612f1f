//! Genomics endpoints: variant-trait associations and variant lookup

pub mod routes;

pub use routes::routes;
