//! # Ridebook Auth Crate
//!
//! Password hashing, session tokens and the role rules that decide where a
//! user lands after signing in.
//!
//! ## Architectural Principles
//!
//! - **No I/O:** Accounts are looked up by the caller. This crate only
//!   checks passwords, signs and verifies tokens, and applies role rules.
//! - **Stored role vs. session role:** An admin may act as a customer or a
//!   driver. The session carries the acting role; privilege checks that
//!   matter (switching roles) always go back to the stored one.
//!
//! ## Public API
//!
//! - `hash_password` / `verify_password`: Argon2id.
//! - `SessionKeys` / `SessionClaims`: HS256 session tokens.
//! - `resolve_login_role`, `resolve_role_switch`, `redirect_path`: role routing.
//! - `AuthError`: the specific error types that can be returned from this crate.

pub mod error;
pub mod password;
pub mod roles;
pub mod session;

pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use roles::{redirect_path, resolve_login_role, resolve_role_switch};
pub use session::{SessionClaims, SessionKeys};
