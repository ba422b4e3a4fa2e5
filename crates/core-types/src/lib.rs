//! # Ridebook Core Types
//!
//! The shared vocabulary of the workspace: roles, trip types and statuses,
//! the persisted records, and the inputs accepted from clients together with
//! their validation rules.
//!
//! This crate performs no I/O. Every other crate depends on it.

pub mod enums;
pub mod error;
pub mod inputs;
pub mod pricing;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Role, Timeframe, TripStatus, TripType};
pub use error::CoreError;
pub use inputs::{
    check_cancellation_reason, check_rating, normalize_email, normalize_tag, DriverUpdate,
    NewDriver, NewTrip, SignupInput, TripFilter,
};
pub use pricing::FareTable;
pub use structs::{
    DriverProfile, DriverSummary, DriverTag, PartySummary, Trip, TripWithParties, UserProfile,
    Vehicle,
};
