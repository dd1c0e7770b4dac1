//! Index repository (legacy flat listing)
//!
//! Categories are stored comma-joined and handed back as a list.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::DbError;
use crate::models::split_categories;

/// Index entry as the caller sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: String,
    pub img: String,
    pub title: String,
    pub summary: String,
    pub categories: Vec<String>,
    pub prod: bool,
}

/// Row as stored
#[derive(Debug, Clone, FromRow)]
struct IndexRow {
    id: String,
    img: String,
    title: String,
    #[sqlx(rename = "abstract")]
    summary: String,
    categories: String,
    prod: bool,
}

impl From<IndexRow> for IndexEntry {
    fn from(row: IndexRow) -> Self {
        Self {
            categories: split_categories(&row.categories),
            id: row.id,
            img: row.img,
            title: row.title,
            summary: row.summary,
            prod: row.prod,
        }
    }
}

/// Index entry about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIndexEntry {
    pub id: String,
    pub img: String,
    pub title: String,
    pub summary: String,
    /// Comma-joined
    pub categories: String,
    pub prod: bool,
}

impl NewIndexEntry {
    /// New entry; a missing or empty id is replaced by a fresh UUID.
    pub fn new(
        id: Option<String>,
        img: String,
        title: String,
        summary: String,
        categories: String,
        prod: bool,
    ) -> Self {
        Self {
            id: id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            img,
            title,
            summary,
            categories,
            prod,
        }
    }

    /// The entry as it will read back from the store.
    pub fn to_entry(&self) -> IndexEntry {
        IndexEntry {
            id: self.id.clone(),
            img: self.img.clone(),
            title: self.title.clone(),
            summary: self.summary.clone(),
            categories: split_categories(&self.categories),
            prod: self.prod,
        }
    }
}

/// Storage operations for the legacy index
#[async_trait]
pub trait IndexStore: Send + Sync {
    async fn list(&self) -> Result<Vec<IndexEntry>, DbError>;

    /// Insert an entry and return its id.
    async fn create(&self, entry: NewIndexEntry) -> Result<String, DbError>;
}

/// PostgreSQL index repository
#[derive(Clone)]
pub struct IndexRepo {
    pool: PgPool,
}

impl IndexRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IndexStore for IndexRepo {
    async fn list(&self) -> Result<Vec<IndexEntry>, DbError> {
        let rows: Vec<IndexRow> = sqlx::query_as(
            r#"SELECT id, img, title, abstract, categories, prod FROM "index""#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(IndexEntry::from).collect())
    }

    async fn create(&self, entry: NewIndexEntry) -> Result<String, DbError> {
        sqlx::query(
            r#"
            INSERT INTO "index" (id, img, title, abstract, categories, prod)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.img)
        .bind(&entry.title)
        .bind(&entry.summary)
        .bind(&entry.categories)
        .bind(entry.prod)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_insert("index entry", &entry.id, e))?;

        Ok(entry.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: Option<&str>) -> NewIndexEntry {
        NewIndexEntry::new(
            id.map(str::to_owned),
            "img".into(),
            "title".into(),
            "abs".into(),
            "a,b".into(),
            false,
        )
    }

    #[test]
    fn generates_id_when_absent_or_empty() {
        assert!(Uuid::parse_str(&entry(None).id).is_ok());
        assert!(Uuid::parse_str(&entry(Some("")).id).is_ok());
        assert_eq!(entry(Some("custom-1")).id, "custom-1");
    }

    #[test]
    fn reads_back_with_split_categories() {
        let read = entry(Some("x")).to_entry();
        assert_eq!(read.categories, vec!["a", "b"]);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_id_conflicts() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");
        let repo = IndexRepo::new(pool);

        let id = Uuid::new_v4().to_string();
        repo.create(entry(Some(&id))).await.unwrap();
        let err = repo.create(entry(Some(&id))).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));
    }
}
