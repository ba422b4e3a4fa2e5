//! Route handlers, one module per audience.

use crate::error::AppError;

pub mod admin;
pub mod customer;
pub mod driver;
pub mod sessions;

/// Argon2 is CPU-bound; it runs on the blocking pool.
async fn hash_off_thread(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

async fn verify_off_thread(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || auth::verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}
