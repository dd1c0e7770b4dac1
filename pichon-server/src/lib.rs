//! pichon-server: HTTP/JSON backend for the pichon blog
//!
//! Posts, categories and the legacy index live in PostgreSQL; newsletter
//! signups are forwarded to Mailchimp. Each request validates its body,
//! runs one store or provider call and maps the outcome to a status code.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod newsletter;

pub use config::{Config, ConfigError};
pub use http::{build_router, run_server, AppState, ServerError};
