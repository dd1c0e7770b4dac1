//! Route handlers organized by resource

pub mod common;
pub mod health;
pub mod posts;
pub mod categories;
pub mod index;
pub mod newsletter;
