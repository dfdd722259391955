//! Middleware for the bid indexer API

mod tracing;

pub use tracing::request_tracing;
