//! Schema bootstrap command

use anyhow::{Context, Result};
use clap::Parser;

use pichon_server::db::{connect, migrations};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides POSTGRES_URI_LOCAL / POSTGRES_URI_PROD)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Create missing tables and indexes
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let mut database = super::database_config(args.database_url)?;
    database.max_connections = 1;

    let pool = connect(&database)
        .await
        .context("Failed to connect to the database")?;

    migrations::run(&pool)
        .await
        .context("Schema migration failed")?;

    pool.close().await;
    Ok(())
}
