//! Runtime configuration from the environment
//!
//! Environment variables:
//!   ENVIRONMENT              # `production` selects POSTGRES_URI_PROD, anything else local
//!   POSTGRES_URI_LOCAL       # Connection string for local runs
//!   POSTGRES_URI_PROD        # Connection string for production
//!   MAILCHIMP_API_KEY        # Provider API key
//!   MAILCHIMP_DC             # Provider data center (e.g. us21)
//!   MAILCHIMP_LIST_ID        # Audience the signups go to
//!   PICHON_BIND              # Bind address (default: 127.0.0.1:5000)
//!   PICHON_MAX_CONNECTIONS   # Pool size (default: 5)
//!   PICHON_CORS_ORIGINS      # Comma-separated allowed origins
//!
//! No secret has a fallback value: a missing one is an error naming it.

use std::fmt;
use std::net::SocketAddr;

use axum::http::HeaderValue;

use crate::db::pool::DEFAULT_MAX_CONNECTIONS;
use crate::newsletter::mailchimp::{MailchimpConfig, DEFAULT_TIMEOUT};

/// Default bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Origins allowed when PICHON_CORS_ORIGINS is unset (the front end's dev server)
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:4200", "http://127.0.0.1:4200"];

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Deployment flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("ENVIRONMENT").as_deref() {
            Some("production") => Self::Production,
            _ => Self::Local,
        }
    }

    /// Variable holding this environment's connection string.
    pub fn database_var(self) -> &'static str {
        match self {
            Self::Local => "POSTGRES_URI_LOCAL",
            Self::Production => "POSTGRES_URI_PROD",
        }
    }
}

/// Database settings
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Connection string from `url_override` when given, else from the
    /// environment's URI variable. Pool size always comes from the lookup.
    pub fn from_lookup<F>(
        environment: Environment,
        url_override: Option<String>,
        lookup: &F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = match url_override {
            Some(url) => url,
            None => required(lookup, environment.database_var())?,
        };
        let max_connections = match non_empty(lookup, "PICHON_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PICHON_MAX_CONNECTIONS",
                reason: format!("'{}' is not a positive integer", raw),
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            url,
            max_connections,
        })
    }
}

impl MailchimpConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_key: required(lookup, "MAILCHIMP_API_KEY")?,
            data_center: required(lookup, "MAILCHIMP_DC")?,
            list_id: required(lookup, "MAILCHIMP_LIST_ID")?,
            timeout: DEFAULT_TIMEOUT,
        })
    }
}

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub bind_addr: SocketAddr,
    /// Allowed CORS origins
    pub cors_origins: Vec<HeaderValue>,
    /// Allow any origin (overrides `cors_origins`)
    pub cors_permissive: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            cors_origins: DEFAULT_CORS_ORIGINS
                .into_iter()
                .map(HeaderValue::from_static)
                .collect(),
            cors_permissive: false,
        }
    }
}

impl HttpConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = non_empty(lookup, "PICHON_BIND") {
            config.bind_addr = raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PICHON_BIND",
                reason: format!("'{}' is not a socket address", raw),
            })?;
        }

        if let Some(raw) = non_empty(lookup, "PICHON_CORS_ORIGINS") {
            config.cors_origins = parse_origins(&raw)?;
        }

        Ok(config)
    }
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| {
            HeaderValue::from_str(o).map_err(|_| ConfigError::Invalid {
                name: "PICHON_CORS_ORIGINS",
                reason: format!("'{}' is not a valid origin", o),
            })
        })
        .collect()
}

/// Full server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub mailchimp: MailchimpConfig,
    pub http: HttpConfig,
}

impl Config {
    /// Load from the process environment.
    ///
    /// `database_url` stands in for POSTGRES_URI_LOCAL / POSTGRES_URI_PROD.
    pub fn from_env(database_url: Option<String>) -> Result<Self, ConfigError> {
        Self::from_lookup(database_url, &|key: &str| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(database_url: Option<String>, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_lookup(lookup);
        Ok(Self {
            environment,
            database: DatabaseConfig::from_lookup(environment, database_url, lookup)?,
            mailchimp: MailchimpConfig::from_lookup(lookup)?,
            http: HttpConfig::from_lookup(lookup)?,
        })
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.trim().is_empty())
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, name).ok_or(ConfigError::Missing(name))
}
