//! Slug derivation
//!
//! Slugs are lowercase titles with spaces swapped for a separator.
//! Nothing else is normalized and collisions are never checked: two posts
//! whose titles differ only in case share a slug.

/// Post slug: lowercase, spaces become hyphens.
///
/// ```
/// use pichon_server::models::post_slug;
///
/// assert_eq!(post_slug("My Post"), "my-post");
/// ```
pub fn post_slug(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}

/// Category slug: lowercase, spaces become underscores.
pub fn category_slug(title: &str) -> String {
    title.to_lowercase().replace(' ', "_")
}
