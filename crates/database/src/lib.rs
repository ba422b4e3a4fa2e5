//! # Ridebook Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database. Accounts, driver profiles, trips and tags all live here.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** This crate encapsulates all database-specific logic. It
//!   provides a clean API to the rest of the application, hiding the
//!   underlying SQL.
//! - **Guarded writes:** Every state change on a trip carries its expected
//!   current state in the `WHERE` clause. A write that matches nothing is
//!   reported as `NotFound` or `Conflict`, never silently ignored.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses a
//!   connection pool (`PgPool`) for concurrent database access.
//!
//! ## Public API
//!
//! - `connect` / `connect_lazy`: build the connection pool from `DatabaseSettings`.
//! - `run_migrations`: applies the embedded migrations.
//! - `DbRepository`: holds the pool and provides all data access methods.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;
mod rows;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_lazy, run_migrations};
pub use error::DbError;
pub use repository::{Audience, Credentials, DbRepository};

#[cfg(test)]
mod tests;
