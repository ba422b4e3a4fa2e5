use chrono::NaiveDate;
use core_types::{DriverProfile, TripStatus, Vehicle};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Headline numbers of the admin dashboard for one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_trips: usize,
    pub completed_trips: usize,
    pub cancelled_trips: usize,
    pub total_revenue: Decimal,
    pub active_drivers: i64,
    /// Mean over rated trips only; zero when nothing was rated.
    pub average_rating: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularDestination {
    pub location: String,
    pub count: usize,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentReview {
    pub driver_name: String,
    pub rating: i16,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: TripStatus,
    pub count: usize,
}

/// The analytics page: totals, top destinations, latest reviews and the
/// status breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminAnalytics {
    pub total_trips: usize,
    pub total_drivers: i64,
    pub total_customers: i64,
    pub total_revenue: Decimal,
    pub popular_destinations: Vec<PopularDestination>,
    pub recent_reviews: Vec<RecentReview>,
    pub trips_by_status: Vec<StatusCount>,
}

/// One row of the admin driver performance table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStats {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub avatar_url: Option<String>,
    pub total_trips: usize,
    pub completed_trips: usize,
    pub cancelled_trips: usize,
    /// Sum of the fares of completed trips.
    pub total_revenue: Decimal,
    pub average_rating: Decimal,
    pub is_active: bool,
    pub license_number: String,
    pub vehicle: Vehicle,
    pub tags: Vec<String>,
}

/// One entry of the admin driver listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverOverview {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub avatar_url: Option<String>,
    pub driver_profile: DriverProfile,
    pub tags: Vec<String>,
    pub rating: Decimal,
    pub total_trips: usize,
}

/// What a driver sees on their own dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverDashboardStats {
    pub today_trips: i64,
    /// Rounded to one decimal place.
    pub average_rating: Decimal,
}
