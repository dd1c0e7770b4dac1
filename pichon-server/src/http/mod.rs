//! HTTP layer
//!
//! Axum server with:
//! - CORS (configured origins only by default)
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod server;
pub mod error;
pub mod extractors;
pub mod routes;

pub use server::{build_router, cors_layer, run_server, AppState, ServerError};
pub use error::ApiError;
