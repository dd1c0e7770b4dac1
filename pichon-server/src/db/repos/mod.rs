//! Repository implementations for database access
//!
//! Each entity has a store trait and a PostgreSQL repository:
//! - One parameterized statement per call
//! - Unique violations surface as `DbError::Conflict`
//! - "Did a row change" answers come from `rows_affected`

pub mod categories;
pub mod posts;
pub mod index;

pub use categories::{Category, CategoryRepo, CategoryStore, NewCategory};
pub use posts::{NewPost, Post, PostFilter, PostRepo, PostStore, PostSummary};
pub use index::{IndexEntry, IndexRepo, IndexStore, NewIndexEntry};
