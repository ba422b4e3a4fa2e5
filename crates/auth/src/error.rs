use core_types::Role;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid role. You are registered as a {registered}")]
    RoleMismatch { registered: Role },

    #[error("Only administrators can switch roles")]
    NotAdmin,

    #[error("Invalid or expired session")]
    InvalidToken,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Session signing failed: {0}")]
    Signing(String),
}
