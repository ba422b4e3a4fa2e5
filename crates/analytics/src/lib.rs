//! # Ridebook Analytics
//!
//! Dashboard statistics for admins and drivers.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** This crate has no knowledge of the database or HTTP. It
//!   depends only on `core-types`.
//! - **Stateless calculation:** The `AnalyticsEngine` takes rows that were
//!   already fetched (`facts`) and folds them into report structs. Everything
//!   here can be tested without a database.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: the calculator.
//! - `facts`: the row shapes the database layer hands in.
//! - `report`: the serializable outputs served by the admin and driver dashboards.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod facts;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use facts::{DriverRecord, ReviewFact, TripFact};
pub use report::{
    AdminAnalytics, AdminStats, DriverDashboardStats, DriverOverview, DriverStats,
    PopularDestination, RecentReview, StatusCount,
};
