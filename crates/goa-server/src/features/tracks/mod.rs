//! Track metadata endpoints

pub mod routes;

pub use routes::routes;
