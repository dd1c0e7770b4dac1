//! Database layer - connection pool, schema bootstrap and repositories
//!
//! # Design Principles
//!
//! - One SQL statement per operation, autocommit, no multi-statement transactions
//! - Rely on DB constraints, map unique violations to conflicts - no check-then-insert
//! - Each entity is reached through a store trait so handlers can run against
//!   the in-memory store in tests

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;

pub use error::DbError;
pub use memory::MemoryStore;
pub use pool::{connect, create_pool, create_pool_with_options};
pub use repos::*;
