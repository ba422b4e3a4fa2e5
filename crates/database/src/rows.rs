//! Row shapes of the joined queries and their conversion into public types.

use crate::repository::Audience;
use analytics::{ReviewFact, TripFact};
use chrono::{DateTime, Utc};
use core_types::{DriverProfile, DriverSummary, PartySummary, Trip, TripStatus, TripWithParties, Vehicle};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Selects a trip with its driver, vehicle and customer. Callers append
/// their own `WHERE` and `ORDER BY`.
pub(crate) const TRIP_WITH_PARTIES: &str = r#"
    SELECT
        t.id, t.user_id, t.driver_id, t.trip_type, t.status, t.pickup_location, t.pickup_time,
        t.dropoff_location, t.dropoff_time, t.flight_number, t.hours, t.cost, t.rating,
        t.reviewed, t.cancellation_reason, t.created_at, t.updated_at,
        d.full_name AS driver_full_name, d.email AS driver_email,
        d.phone_number AS driver_phone_number, d.avatar_url AS driver_avatar_url,
        dp.vehicle_make, dp.vehicle_model, dp.vehicle_year, dp.vehicle_color, dp.vehicle_plate,
        c.full_name AS customer_full_name, c.email AS customer_email,
        c.phone_number AS customer_phone_number, c.avatar_url AS customer_avatar_url
    FROM trips AS t
    JOIN user_profiles AS c ON c.id = t.user_id
    LEFT JOIN user_profiles AS d ON d.id = t.driver_id
    LEFT JOIN driver_profiles AS dp ON dp.user_id = t.driver_id
"#;

#[derive(Debug, FromRow)]
pub(crate) struct TripRow {
    #[sqlx(flatten)]
    pub trip: Trip,
    pub driver_full_name: Option<String>,
    pub driver_email: Option<String>,
    pub driver_phone_number: Option<String>,
    pub driver_avatar_url: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_year: Option<i32>,
    pub vehicle_color: Option<String>,
    pub vehicle_plate: Option<String>,
    pub customer_full_name: String,
    pub customer_email: String,
    pub customer_phone_number: Option<String>,
    pub customer_avatar_url: Option<String>,
}

impl TripRow {
    pub fn into_view(self, audience: Audience) -> TripWithParties {
        let show_driver = matches!(audience, Audience::Customer | Audience::Admin);
        let show_customer = matches!(audience, Audience::Driver | Audience::Admin);

        let vehicle = match (
            self.vehicle_make,
            self.vehicle_model,
            self.vehicle_year,
            self.vehicle_color,
            self.vehicle_plate,
        ) {
            (Some(make), Some(model), Some(year), Some(color), Some(plate)) => Some(Vehicle {
                make,
                model,
                year,
                color,
                plate,
            }),
            _ => None,
        };

        let driver = match (self.trip.driver_id, self.driver_full_name, self.driver_email) {
            (Some(id), Some(full_name), Some(email)) if show_driver => Some(DriverSummary {
                id,
                full_name,
                phone_number: self.driver_phone_number,
                email,
                avatar_url: self.driver_avatar_url,
                vehicle,
            }),
            _ => None,
        };

        let customer = show_customer.then(|| PartySummary {
            id: self.trip.user_id,
            full_name: self.customer_full_name,
            email: self.customer_email,
            phone_number: self.customer_phone_number,
            avatar_url: self.customer_avatar_url,
        });

        TripWithParties {
            trip: self.trip,
            driver,
            customer,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct DriverAccountRow {
    #[sqlx(flatten)]
    pub profile: DriverProfile,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, FromRow)]
pub(crate) struct TripFactRow {
    pub driver_id: Option<Uuid>,
    pub status: TripStatus,
    pub cost: Decimal,
    pub rating: Option<i16>,
    pub dropoff_location: Option<String>,
}

impl From<TripFactRow> for TripFact {
    fn from(row: TripFactRow) -> Self {
        TripFact {
            status: row.status,
            cost: row.cost,
            rating: row.rating,
            dropoff_location: row.dropoff_location,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ReviewRow {
    pub driver_name: Option<String>,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for ReviewFact {
    fn from(row: ReviewRow) -> Self {
        ReviewFact {
            driver_name: row.driver_name,
            rating: row.rating,
            created_at: row.created_at,
        }
    }
}
