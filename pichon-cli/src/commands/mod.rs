//! Command implementations for the pichon CLI

pub mod migrate;
pub mod serve;

pub use migrate::run_migrate;
pub use serve::run_serve;

use anyhow::Result;
use pichon_server::config::{DatabaseConfig, Environment};

/// Read a process environment variable.
fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Database settings from a `--database-url` override or the environment.
fn database_config(url_override: Option<String>) -> Result<DatabaseConfig> {
    let environment = Environment::from_lookup(&env_lookup);
    Ok(DatabaseConfig::from_lookup(environment, url_override, &env_lookup)?)
}
