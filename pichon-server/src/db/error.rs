//! Storage error type

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A unique constraint rejected the write.
    #[error("{resource} '{key}' already exists")]
    Conflict { resource: &'static str, key: String },

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// Classify a failed INSERT: unique violations become `Conflict`.
    pub(crate) fn from_insert(resource: &'static str, key: impl Into<String>, err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                tracing::debug!(
                    resource,
                    constraint = db_err.constraint().unwrap_or("unknown"),
                    "unique constraint violated"
                );
                Self::Conflict {
                    resource,
                    key: key.into(),
                }
            }
            _ => Self::Sqlx(err),
        }
    }
}
