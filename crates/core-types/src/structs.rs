use crate::enums::{Role, TripStatus, TripType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row of `user_profiles`. Every account has exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// License and vehicle metadata attached to a driver account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DriverProfile {
    pub user_id: Uuid,
    pub license_number: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_year: i32,
    pub vehicle_color: String,
    pub vehicle_plate: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DriverProfile {
    pub fn vehicle(&self) -> Vehicle {
        Vehicle {
            make: self.vehicle_make.clone(),
            model: self.vehicle_model.clone(),
            year: self.vehicle_year,
            color: self.vehicle_color.clone(),
            plate: self.vehicle_plate.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub user_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub trip_type: TripType,
    pub status: TripStatus,
    pub pickup_location: String,
    pub pickup_time: DateTime<Utc>,
    pub dropoff_location: Option<String>,
    pub dropoff_time: Option<DateTime<Utc>>,
    pub flight_number: Option<String>,
    pub hours: Option<i32>,
    pub cost: Decimal,
    pub rating: Option<i16>,
    pub reviewed: bool,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DriverTag {
    pub driver_id: Uuid,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub plate: String,
}

/// The driver as shown to a customer or an admin next to a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSummary {
    pub id: Uuid,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub email: String,
    pub avatar_url: Option<String>,
    pub vehicle: Option<Vehicle>,
}

/// The customer as shown to a driver or an admin next to a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartySummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub avatar_url: Option<String>,
}

/// A trip together with whichever of its parties the caller is allowed to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripWithParties {
    #[serde(flatten)]
    pub trip: Trip,
    pub driver: Option<DriverSummary>,
    pub customer: Option<PartySummary>,
}
