//! Domain models with validation at construction
//!
//! Request bodies arrive as raw JSON objects. Everything a handler needs
//! is pulled out of them here, so a bad request returns ValidationError
//! before any store is touched.

pub mod validation;
pub mod slug;
pub mod categories;
pub mod fields;
pub mod patch;

pub use validation::ValidationError;
pub use slug::{category_slug, post_slug};
pub use categories::{join_categories, split_categories};
pub use fields::BodyFields;
pub use patch::PostPatch;
