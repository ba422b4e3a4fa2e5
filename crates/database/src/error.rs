use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database configuration: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// The row exists but is not in a state that allows the write.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl DbError {
    pub fn conflict(message: impl Into<String>) -> Self {
        DbError::Conflict(message.into())
    }

    /// Maps a unique-constraint violation to `Conflict`, leaving other errors untouched.
    pub(crate) fn on_unique(err: sqlx::Error, message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DbError::Conflict(message.to_string())
            }
            _ => DbError::QueryError(err),
        }
    }
}
