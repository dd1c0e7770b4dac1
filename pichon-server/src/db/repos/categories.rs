//! Category repository
//!
//! - list: ordered for display, `"order"` then id
//! - create: INSERT ... RETURNING id, duplicates become conflicts
//! - delete: by id, reports whether a row went away

use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::db::DbError;
use crate::models::category_slug;

/// Category record from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub order: i32,
}

/// Category about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub order: i32,
}

impl NewCategory {
    /// Category named after `title`, slug derived from it.
    pub fn from_title(title: impl Into<String>, order: i32) -> Self {
        let name = title.into();
        Self {
            slug: category_slug(&name),
            name,
            order,
        }
    }
}

/// Storage operations for categories
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories, `order` ascending then `id` ascending.
    async fn list(&self) -> Result<Vec<Category>, DbError>;

    /// Insert a category and return its generated id.
    async fn create(&self, category: NewCategory) -> Result<i32, DbError>;

    /// Remove a category, returning whether it existed.
    async fn delete(&self, id: i32) -> Result<bool, DbError>;
}

/// PostgreSQL category repository
#[derive(Clone)]
pub struct CategoryRepo {
    pool: PgPool,
}

impl CategoryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for CategoryRepo {
    async fn list(&self) -> Result<Vec<Category>, DbError> {
        let categories: Vec<Category> = sqlx::query_as(
            r#"
            SELECT id, name, slug, "order"
            FROM categories
            ORDER BY "order" ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn create(&self, category: NewCategory) -> Result<i32, DbError> {
        let row: (i32,) = sqlx::query_as(
            r#"
            INSERT INTO categories (name, slug, "order")
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_insert("category", &category.name, e))?;

        Ok(row.0)
    }

    async fn delete(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p pichon-server -- --ignored

    async fn repo() -> CategoryRepo {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");
        CategoryRepo::new(pool)
    }

    #[test]
    fn slug_follows_title() {
        let category = NewCategory::from_title("Rust Tips", 3);
        assert_eq!(category.name, "Rust Tips");
        assert_eq!(category.slug, "rust_tips");
        assert_eq!(category.order, 3);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_name_conflicts() {
        let repo = repo().await;
        let name = format!("Dup {}", uuid::Uuid::new_v4());

        let id = repo.create(NewCategory::from_title(&name, 1)).await.unwrap();
        let err = repo.create(NewCategory::from_title(&name, 2)).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
    }
}
