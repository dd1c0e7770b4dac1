//! Post repository
//!
//! Handles post CRUD:
//! - list: summaries newest first, optionally published only
//! - update: one dynamic UPDATE built from an allow-listed patch
//! - delete: reports whether a row went away

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::DbError;
use crate::models::{post_slug, PostPatch};

/// Full post record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[sqlx(rename = "abstract")]
    pub summary: String,
    pub thumbnail_url: String,
    pub categories: String,
    pub is_published: bool,
    pub published_at: DateTime<Utc>,
    pub content: String,
}

/// Post without its content, for listings
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[sqlx(rename = "abstract")]
    pub summary: String,
    pub thumbnail_url: String,
    pub published_at: DateTime<Utc>,
    pub categories: String,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            slug: post.slug.clone(),
            summary: post.summary.clone(),
            thumbnail_url: post.thumbnail_url.clone(),
            published_at: post.published_at,
            categories: post.categories.clone(),
        }
    }
}

/// Post about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub thumbnail_url: String,
    pub categories: String,
    pub is_published: bool,
    pub published_at: DateTime<Utc>,
    pub content: String,
}

impl NewPost {
    /// Stamp a new post: slug from the title, `published_at` now, and a
    /// fresh id unless the caller supplied one.
    pub fn new(
        id: Option<Uuid>,
        title: String,
        summary: String,
        thumbnail_url: String,
        categories: String,
        is_published: bool,
        content: String,
    ) -> Self {
        Self {
            id: id.unwrap_or_else(Uuid::new_v4),
            slug: post_slug(&title),
            title,
            summary,
            thumbnail_url,
            categories,
            is_published,
            published_at: Utc::now(),
            content,
        }
    }
}

/// Listing filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub published_only: bool,
}

/// Storage operations for posts
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Post summaries, newest `published_at` first.
    async fn list(&self, filter: PostFilter) -> Result<Vec<PostSummary>, DbError>;

    async fn get(&self, id: Uuid) -> Result<Option<Post>, DbError>;

    /// Insert a post and return its id.
    async fn create(&self, post: NewPost) -> Result<Uuid, DbError>;

    /// Apply a patch, returning whether a row matched.
    async fn update(&self, id: Uuid, patch: &PostPatch) -> Result<bool, DbError>;

    /// Remove a post, returning whether it existed.
    async fn delete(&self, id: Uuid) -> Result<bool, DbError>;
}

/// PostgreSQL post repository
#[derive(Clone)]
pub struct PostRepo {
    pool: PgPool,
}

impl PostRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build `UPDATE posts SET ... WHERE id = $n` for a patch.
fn update_query(id: Uuid, patch: &PostPatch) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE posts SET ");
    {
        let mut set = builder.separated(", ");
        if let (Some(title), Some(slug)) = (patch.title(), patch.slug()) {
            set.push("title = ").push_bind_unseparated(title.to_owned());
            set.push("slug = ").push_bind_unseparated(slug);
        }
        if let Some(summary) = patch.summary() {
            set.push("abstract = ").push_bind_unseparated(summary.to_owned());
        }
        if let Some(url) = patch.thumbnail_url() {
            set.push("thumbnail_url = ").push_bind_unseparated(url.to_owned());
        }
        if let Some(categories) = patch.categories() {
            set.push("categories = ").push_bind_unseparated(categories.to_owned());
        }
        if let Some(published) = patch.is_published() {
            set.push("is_published = ").push_bind_unseparated(published);
        }
        if let Some(content) = patch.content() {
            set.push("content = ").push_bind_unseparated(content.to_owned());
        }
    }
    builder.push(" WHERE id = ").push_bind(id);
    builder
}

#[async_trait]
impl PostStore for PostRepo {
    async fn list(&self, filter: PostFilter) -> Result<Vec<PostSummary>, DbError> {
        let posts: Vec<PostSummary> = sqlx::query_as(
            r#"
            SELECT id, title, slug, abstract, thumbnail_url, published_at, categories
            FROM posts
            WHERE ($1 = FALSE OR is_published = TRUE)
            ORDER BY published_at DESC
            "#,
        )
        .bind(filter.published_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>, DbError> {
        let post: Option<Post> = sqlx::query_as(
            r#"
            SELECT id, title, slug, abstract, thumbnail_url, categories,
                   is_published, published_at, content
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn create(&self, post: NewPost) -> Result<Uuid, DbError> {
        sqlx::query(
            r#"
            INSERT INTO posts
                (id, title, slug, abstract, thumbnail_url, categories,
                 is_published, published_at, content)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.summary)
        .bind(&post.thumbnail_url)
        .bind(&post.categories)
        .bind(post.is_published)
        .bind(post.published_at)
        .bind(&post.content)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_insert("post", post.id.to_string(), e))?;

        Ok(post.id)
    }

    async fn update(&self, id: Uuid, patch: &PostPatch) -> Result<bool, DbError> {
        let mut query = update_query(id, patch);
        let result = query.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
