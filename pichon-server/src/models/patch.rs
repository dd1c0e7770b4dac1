//! Partial post updates
//!
//! Only an allow-listed subset of post fields can be changed through
//! PATCH. A patch is never empty once constructed.

use serde_json::{Map, Value};

use super::{post_slug, BodyFields, ValidationError};

/// Request fields a PATCH body may carry.
pub const PATCHABLE_FIELDS: [&str; 6] = ["title", "abstract", "img", "categories", "prod", "content"];

/// Validated, non-empty set of post changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPatch {
    title: Option<String>,
    summary: Option<String>,
    thumbnail_url: Option<String>,
    categories: Option<String>,
    is_published: Option<bool>,
    content: Option<String>,
}

impl PostPatch {
    /// Build a patch from a PATCH body.
    ///
    /// # Errors
    ///
    /// - `UnknownField` for any key outside [`PATCHABLE_FIELDS`]
    /// - `NoFields` for an empty object
    /// - `InvalidType` when a value has the wrong JSON type
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, ValidationError> {
        if let Some(field) = body.keys().find(|k| !PATCHABLE_FIELDS.contains(&k.as_str())) {
            return Err(ValidationError::UnknownField {
                field: field.clone(),
            });
        }
        if body.is_empty() {
            return Err(ValidationError::NoFields);
        }

        let fields = BodyFields::new(body);
        let categories = match body.get("categories").filter(|v| !v.is_null()) {
            Some(_) => Some(fields.required_categories("categories")?),
            None => None,
        };
        let is_published = match body.get("prod").filter(|v| !v.is_null()) {
            Some(_) => Some(fields.required_bool("prod")?),
            None => None,
        };

        let patch = Self {
            title: fields.optional_str("title")?,
            summary: fields.optional_str("abstract")?,
            thumbnail_url: fields.optional_str("img")?,
            categories,
            is_published,
            content: fields.optional_str("content")?,
        };

        // Every key was allow-listed but all of them were null.
        if patch.is_empty() {
            return Err(ValidationError::NoFields);
        }
        Ok(patch)
    }

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.summary.is_none()
            && self.thumbnail_url.is_none()
            && self.categories.is_none()
            && self.is_published.is_none()
            && self.content.is_none()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Slug to store alongside a changed title.
    pub fn slug(&self) -> Option<String> {
        self.title.as_deref().map(post_slug)
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }

    pub fn categories(&self) -> Option<&str> {
        self.categories.as_deref()
    }

    pub fn is_published(&self) -> Option<bool> {
        self.is_published
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}
