use crate::enums::TripType;
use crate::inputs::NewTrip;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fares used to price a booking at creation time.
///
/// Airport transfers are a flat fare; city tours are billed per hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareTable {
    pub airport_flat_fare: Decimal,
    pub city_tour_hourly_rate: Decimal,
}

impl FareTable {
    /// Quotes a trip that has already been validated.
    pub fn quote(&self, trip: &NewTrip) -> Decimal {
        match trip.trip_type {
            TripType::AirportPickup | TripType::AirportDropoff => self.airport_flat_fare,
            TripType::CityTour => {
                let hours = trip.hours.unwrap_or(1).max(1);
                self.city_tour_hourly_rate * Decimal::from(hours)
            }
        }
        .round_dp(2)
    }
}
