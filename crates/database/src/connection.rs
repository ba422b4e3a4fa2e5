use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

fn pool_options(settings: &DatabaseSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
}

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool is shared across the entire application. Fails fast if the
/// database cannot be reached.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    if settings.url.trim().is_empty() {
        return Err(DbError::ConnectionConfigError(
            "database.url (or DATABASE_URL) must be set.".to_string(),
        ));
    }

    let pool = pool_options(settings).connect(&settings.url).await?;
    tracing::info!(max_connections = settings.max_connections, "Database pool ready");
    Ok(pool)
}

/// Builds a pool that opens no connection until the first query.
pub fn connect_lazy(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    Ok(pool_options(settings).connect_lazy(&settings.url)?)
}

/// Applies the migrations embedded from `./migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
