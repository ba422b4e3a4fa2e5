use chrono::{DateTime, Utc};
use core_types::{DriverProfile, TripStatus};
use rust_decimal::Decimal;
use uuid::Uuid;

/// The slice of a trip row that the statistics need.
#[derive(Debug, Clone, PartialEq)]
pub struct TripFact {
    pub status: TripStatus,
    pub cost: Decimal,
    pub rating: Option<i16>,
    pub dropoff_location: Option<String>,
}

/// A driver account with everything the admin tables show about it.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverRecord {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub avatar_url: Option<String>,
    pub driver_profile: DriverProfile,
    pub tags: Vec<String>,
    pub trips: Vec<TripFact>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewFact {
    pub driver_name: Option<String>,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}
