//! HTTP server command
//!
//! Resolves configuration (flags over environment), connects the pool,
//! bootstraps the schema and serves until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use pichon_server::config::Config;
use pichon_server::db::{connect, migrations};
use pichon_server::newsletter::{MailchimpClient, MailingList};
use pichon_server::{run_server, AppState};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: PICHON_BIND or 127.0.0.1:5000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides POSTGRES_URI_LOCAL / POSTGRES_URI_PROD)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Connection pool size (overrides PICHON_MAX_CONNECTIONS)
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Do not create missing tables on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = Config::from_env(args.database_url)?;
    if let Some(max) = args.max_connections {
        config.database.max_connections = max;
    }
    if let Some(bind) = args.bind {
        config.http.bind_addr = bind;
    }
    config.http.cors_permissive |= args.cors_permissive;

    let Config {
        environment,
        database,
        mailchimp,
        http,
    } = config;

    tracing::info!(
        ?environment,
        bind = %http.bind_addr,
        max_connections = database.max_connections,
        "Starting pichon server"
    );

    // Create database pool
    let pool = connect(&database)
        .await
        .context("Failed to create database pool")?;

    if args.skip_migrations {
        tracing::info!("Skipping schema migrations");
    } else {
        migrations::run(&pool)
            .await
            .context("Schema migration failed")?;
    }

    let newsletter = MailchimpClient::new(mailchimp).context("Failed to build Mailchimp client")?;
    match newsletter.ping().await {
        Ok(()) => tracing::info!("Mailchimp reachable"),
        Err(err) => tracing::warn!(%err, "Mailchimp ping failed; signups may be rejected"),
    }

    let state = AppState::from_pool(pool, Arc::new(newsletter));

    // Run server (blocks until shutdown)
    run_server(state, http).await.context("Server error")?;

    Ok(())
}
