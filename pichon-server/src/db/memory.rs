//! In-memory store
//!
//! Implements every store trait over plain vectors behind a mutex, with
//! the same uniqueness and ordering rules the PostgreSQL schema enforces.
//! Used by handler tests in place of a database.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use super::repos::{
    Category, CategoryStore, IndexEntry, IndexStore, NewCategory, NewIndexEntry, NewPost, Post,
    PostFilter, PostStore, PostSummary,
};
use super::DbError;
use crate::models::PostPatch;

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    last_category_id: i32,
    posts: Vec<Post>,
    index: Vec<NewIndexEntry>,
}

/// Shared in-memory tables; clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored posts.
    pub fn post_count(&self) -> usize {
        self.tables().posts.len()
    }

    /// Number of stored categories.
    pub fn category_count(&self) -> usize {
        self.tables().categories.len()
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Category>, DbError> {
        let mut categories = self.tables().categories.clone();
        categories.sort_by_key(|c| (c.order, c.id));
        Ok(categories)
    }

    async fn create(&self, category: NewCategory) -> Result<i32, DbError> {
        let mut tables = self.tables();
        let taken = tables
            .categories
            .iter()
            .any(|c| c.name == category.name || c.slug == category.slug);
        if taken {
            return Err(DbError::Conflict {
                resource: "category",
                key: category.name,
            });
        }

        tables.last_category_id += 1;
        let id = tables.last_category_id;
        tables.categories.push(Category {
            id,
            name: category.name,
            slug: category.slug,
            order: category.order,
        });
        Ok(id)
    }

    async fn delete(&self, id: i32) -> Result<bool, DbError> {
        let mut tables = self.tables();
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        Ok(tables.categories.len() < before)
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list(&self, filter: PostFilter) -> Result<Vec<PostSummary>, DbError> {
        let tables = self.tables();
        let mut posts: Vec<PostSummary> = tables
            .posts
            .iter()
            .filter(|p| !filter.published_only || p.is_published)
            .map(PostSummary::from)
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>, DbError> {
        Ok(self.tables().posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, post: NewPost) -> Result<Uuid, DbError> {
        let mut tables = self.tables();
        if tables.posts.iter().any(|p| p.id == post.id) {
            return Err(DbError::Conflict {
                resource: "post",
                key: post.id.to_string(),
            });
        }

        let id = post.id;
        tables.posts.push(Post {
            id: post.id,
            title: post.title,
            slug: post.slug,
            summary: post.summary,
            thumbnail_url: post.thumbnail_url,
            categories: post.categories,
            is_published: post.is_published,
            published_at: post.published_at,
            content: post.content,
        });
        Ok(id)
    }

    async fn update(&self, id: Uuid, patch: &PostPatch) -> Result<bool, DbError> {
        let mut tables = self.tables();
        let Some(post) = tables.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };

        if let (Some(title), Some(slug)) = (patch.title(), patch.slug()) {
            post.title = title.to_owned();
            post.slug = slug;
        }
        if let Some(summary) = patch.summary() {
            post.summary = summary.to_owned();
        }
        if let Some(url) = patch.thumbnail_url() {
            post.thumbnail_url = url.to_owned();
        }
        if let Some(categories) = patch.categories() {
            post.categories = categories.to_owned();
        }
        if let Some(published) = patch.is_published() {
            post.is_published = published;
        }
        if let Some(content) = patch.content() {
            post.content = content.to_owned();
        }
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let mut tables = self.tables();
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        Ok(tables.posts.len() < before)
    }
}

#[async_trait]
impl IndexStore for MemoryStore {
    async fn list(&self) -> Result<Vec<IndexEntry>, DbError> {
        Ok(self.tables().index.iter().map(NewIndexEntry::to_entry).collect())
    }

    async fn create(&self, entry: NewIndexEntry) -> Result<String, DbError> {
        let mut tables = self.tables();
        if tables.index.iter().any(|e| e.id == entry.id) {
            return Err(DbError::Conflict {
                resource: "index entry",
                key: entry.id,
            });
        }

        let id = entry.id.clone();
        tables.index.push(entry);
        Ok(id)
    }
}
