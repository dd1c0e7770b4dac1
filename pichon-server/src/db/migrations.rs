//! Schema bootstrap for the blog tables
//!
//! Idempotent: every statement is `IF NOT EXISTS`, so running on each
//! start is safe.

use sqlx::PgPool;

const STATEMENTS: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        slug TEXT NOT NULL UNIQUE,
        "order" INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        slug TEXT NOT NULL,
        abstract TEXT NOT NULL,
        thumbnail_url TEXT NOT NULL,
        categories TEXT NOT NULL DEFAULT '',
        is_published BOOLEAN NOT NULL DEFAULT FALSE,
        published_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        content TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS posts_published_at_idx ON posts (published_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS "index" (
        id TEXT PRIMARY KEY,
        img TEXT NOT NULL,
        title TEXT NOT NULL,
        abstract TEXT NOT NULL,
        categories TEXT NOT NULL DEFAULT '',
        prod BOOLEAN NOT NULL DEFAULT FALSE
    )
    "#,
];

/// Create the categories, posts and index tables if they are missing.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running schema migrations...");

    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Schema migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_identifiers_are_quoted() {
        assert!(STATEMENTS[0].contains(r#""order" INTEGER"#));
        assert!(STATEMENTS[3].contains(r#"CREATE TABLE IF NOT EXISTS "index""#));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrations_are_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");

        run(&pool).await.expect("first run");
        run(&pool).await.expect("second run");
    }
}
