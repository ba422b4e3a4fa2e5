use crate::facts::{DriverRecord, ReviewFact, TripFact};
use crate::report::{
    AdminAnalytics, AdminStats, DriverDashboardStats, DriverOverview, DriverStats,
    PopularDestination, RecentReview, StatusCount,
};
use core_types::TripStatus;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Shown in the review feed when the reviewed trip lost its driver.
const UNKNOWN_DRIVER: &str = "Unknown Driver";

/// A stateless calculator for the admin and driver dashboards.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Headline numbers for the admin dashboard.
    ///
    /// # Arguments
    ///
    /// * `trips` - Every trip created inside the selected timeframe.
    /// * `active_drivers` - The number of drivers currently accepting work.
    pub fn admin_stats(&self, trips: &[TripFact], active_drivers: i64) -> AdminStats {
        AdminStats {
            total_trips: trips.len(),
            completed_trips: count_status(trips, TripStatus::Completed),
            cancelled_trips: count_status(trips, TripStatus::Cancelled),
            total_revenue: trips.iter().map(|t| t.cost).sum(),
            active_drivers,
            average_rating: average_rating(trips.iter().filter_map(|t| t.rating), 2),
        }
    }

    /// Drop-off locations ranked by how often they were booked.
    ///
    /// Locations are grouped exactly as entered. Ties are broken
    /// alphabetically so the ranking is stable between calls. Trips without a
    /// drop-off (city tours) are ignored.
    pub fn popular_destinations(&self, trips: &[TripFact], limit: usize) -> Vec<PopularDestination> {
        let mut by_location: HashMap<&str, (usize, Decimal)> = HashMap::new();
        for trip in trips {
            let Some(location) = trip.dropoff_location.as_deref().filter(|l| !l.is_empty()) else {
                continue;
            };
            let entry = by_location.entry(location).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += trip.cost;
        }

        let mut ranked: Vec<PopularDestination> = by_location
            .into_iter()
            .map(|(location, (count, total_revenue))| PopularDestination {
                location: location.to_string(),
                count,
                total_revenue,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.location.cmp(&b.location)));
        ranked.truncate(limit);
        ranked
    }

    /// Everything the analytics page shows.
    ///
    /// `reviews` is expected newest first; it is passed through in order.
    pub fn admin_analytics(
        &self,
        trips: &[TripFact],
        total_drivers: i64,
        total_customers: i64,
        reviews: &[ReviewFact],
    ) -> AdminAnalytics {
        let recent_reviews = reviews
            .iter()
            .map(|r| RecentReview {
                driver_name: r
                    .driver_name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_DRIVER.to_string()),
                rating: r.rating,
                date: r.created_at.date_naive(),
            })
            .collect();

        let trips_by_status = TripStatus::ALL
            .iter()
            .map(|&status| StatusCount {
                status,
                count: count_status(trips, status),
            })
            .collect();

        AdminAnalytics {
            total_trips: trips.len(),
            total_drivers,
            total_customers,
            total_revenue: trips.iter().map(|t| t.cost).sum(),
            popular_destinations: self.popular_destinations(trips, 5),
            recent_reviews,
            trips_by_status,
        }
    }

    /// Per-driver performance rows for the admin table.
    pub fn driver_stats(&self, drivers: &[DriverRecord]) -> Vec<DriverStats> {
        drivers
            .iter()
            .map(|d| {
                let completed: Vec<&TripFact> = d
                    .trips
                    .iter()
                    .filter(|t| t.status == TripStatus::Completed)
                    .collect();
                DriverStats {
                    id: d.id,
                    full_name: d.full_name.clone(),
                    email: d.email.clone(),
                    phone_number: d.phone_number.clone(),
                    avatar_url: d.avatar_url.clone(),
                    total_trips: d.trips.len(),
                    completed_trips: completed.len(),
                    cancelled_trips: count_status(&d.trips, TripStatus::Cancelled),
                    total_revenue: completed.iter().map(|t| t.cost).sum(),
                    average_rating: average_rating(d.trips.iter().filter_map(|t| t.rating), 1),
                    is_active: d.driver_profile.is_active,
                    license_number: d.driver_profile.license_number.clone(),
                    vehicle: d.driver_profile.vehicle(),
                    tags: d.tags.clone(),
                }
            })
            .collect()
    }

    /// The admin driver listing: profile, tags, rating and trip count.
    pub fn driver_overview(&self, drivers: &[DriverRecord]) -> Vec<DriverOverview> {
        drivers
            .iter()
            .map(|d| DriverOverview {
                id: d.id,
                full_name: d.full_name.clone(),
                email: d.email.clone(),
                phone_number: d.phone_number.clone(),
                avatar_url: d.avatar_url.clone(),
                driver_profile: d.driver_profile.clone(),
                tags: d.tags.clone(),
                rating: mean_rating(d.trips.iter().filter_map(|t| t.rating)),
                total_trips: d.trips.len(),
            })
            .collect()
    }

    pub fn driver_dashboard(&self, today_trips: i64, ratings: &[i16]) -> DriverDashboardStats {
        DriverDashboardStats {
            today_trips,
            average_rating: average_rating(ratings.iter().copied(), 1),
        }
    }
}

fn count_status(trips: &[TripFact], status: TripStatus) -> usize {
    trips.iter().filter(|t| t.status == status).count()
}

/// Mean of the given ratings, or zero for none.
fn mean_rating(ratings: impl Iterator<Item = i16>) -> Decimal {
    let (sum, count) = ratings.fold((0i64, 0i64), |(s, c), r| (s + i64::from(r), c + 1));
    if count == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(sum) / Decimal::from(count)
}

fn average_rating(ratings: impl Iterator<Item = i16>, dp: u32) -> Decimal {
    mean_rating(ratings).round_dp(dp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::DriverProfile;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn trip(status: TripStatus, cost: Decimal, rating: Option<i16>, dropoff: Option<&str>) -> TripFact {
        TripFact {
            status,
            cost,
            rating,
            dropoff_location: dropoff.map(str::to_string),
        }
    }

    fn driver(name: &str, is_active: bool, trips: Vec<TripFact>) -> DriverRecord {
        let id = Uuid::new_v4();
        let now = Utc::now();
        DriverRecord {
            id,
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone_number: None,
            avatar_url: None,
            driver_profile: DriverProfile {
                user_id: id,
                license_number: "DL-001".to_string(),
                vehicle_make: "Toyota".to_string(),
                vehicle_model: "Camry".to_string(),
                vehicle_year: 2022,
                vehicle_color: "Black".to_string(),
                vehicle_plate: "ABC123".to_string(),
                is_active,
                created_at: now,
                updated_at: now,
            },
            tags: vec!["vip".to_string()],
            trips,
        }
    }

    #[test]
    fn test_admin_stats_with_no_trips_is_zeroed() {
        let stats = AnalyticsEngine::new().admin_stats(&[], 3);
        assert_eq!(stats.total_trips, 0);
        assert_eq!(stats.total_revenue, Decimal::ZERO);
        assert_eq!(stats.average_rating, Decimal::ZERO);
        assert_eq!(stats.active_drivers, 3);
    }

    #[test]
    fn test_admin_stats_counts_and_averages() {
        let trips = vec![
            trip(TripStatus::Completed, dec!(85.00), Some(5), Some("JFK")),
            trip(TripStatus::Completed, dec!(130.00), Some(4), None),
            trip(TripStatus::Cancelled, dec!(85.00), None, Some("LGA")),
            trip(TripStatus::Scheduled, dec!(85.00), None, Some("JFK")),
        ];
        let stats = AnalyticsEngine::new().admin_stats(&trips, 2);

        assert_eq!(stats.total_trips, 4);
        assert_eq!(stats.completed_trips, 2);
        assert_eq!(stats.cancelled_trips, 1);
        assert_eq!(stats.total_revenue, dec!(385.00));
        assert_eq!(stats.average_rating, dec!(4.50));
    }

    #[test]
    fn test_popular_destinations_rank_by_count_then_name() {
        let trips = vec![
            trip(TripStatus::Completed, dec!(85), None, Some("LGA")),
            trip(TripStatus::Completed, dec!(85), None, Some("JFK")),
            trip(TripStatus::Scheduled, dec!(85), None, Some("JFK")),
            trip(TripStatus::Scheduled, dec!(85), None, Some("jfk")),
            trip(TripStatus::Completed, dec!(85), None, Some("EWR")),
            trip(TripStatus::Completed, dec!(130), None, None),
            trip(TripStatus::Completed, dec!(85), None, Some("")),
        ];
        let ranked = AnalyticsEngine::new().popular_destinations(&trips, 5);

        let names: Vec<&str> = ranked.iter().map(|d| d.location.as_str()).collect();
        assert_eq!(names, vec!["JFK", "EWR", "LGA", "jfk"]);
        assert_eq!(ranked[0].count, 2);
        assert_eq!(ranked[0].total_revenue, dec!(170));
    }

    #[test]
    fn test_popular_destinations_respects_limit() {
        let trips: Vec<TripFact> = ["A", "B", "C", "D", "E", "F"]
            .iter()
            .map(|l| trip(TripStatus::Completed, dec!(85), None, Some(l)))
            .collect();
        assert_eq!(AnalyticsEngine::new().popular_destinations(&trips, 5).len(), 5);
    }

    #[test]
    fn test_admin_analytics_fills_unknown_driver_and_every_status() {
        let reviews = vec![
            ReviewFact {
                driver_name: Some("Dana".to_string()),
                rating: 5,
                created_at: Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap(),
            },
            ReviewFact {
                driver_name: None,
                rating: 3,
                created_at: Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 0).unwrap(),
            },
        ];
        let trips = vec![trip(TripStatus::EnRoute, dec!(85), None, Some("JFK"))];
        let analytics = AnalyticsEngine::new().admin_analytics(&trips, 4, 10, &reviews);

        assert_eq!(analytics.recent_reviews[0].driver_name, "Dana");
        assert_eq!(analytics.recent_reviews[1].driver_name, UNKNOWN_DRIVER);
        assert_eq!(
            analytics.recent_reviews[1].date,
            chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert_eq!(analytics.trips_by_status.len(), 4);
        let en_route = analytics
            .trips_by_status
            .iter()
            .find(|s| s.status == TripStatus::EnRoute)
            .unwrap();
        assert_eq!(en_route.count, 1);
        assert_eq!(analytics.total_drivers, 4);
        assert_eq!(analytics.total_customers, 10);
    }

    #[test]
    fn test_driver_stats_revenue_counts_completed_only() {
        let record = driver(
            "Dana",
            true,
            vec![
                trip(TripStatus::Completed, dec!(85.00), Some(5), Some("JFK")),
                trip(TripStatus::Completed, dec!(65.00), Some(4), None),
                trip(TripStatus::Completed, dec!(85.00), Some(4), Some("JFK")),
                trip(TripStatus::Scheduled, dec!(85.00), None, Some("LGA")),
                trip(TripStatus::Cancelled, dec!(85.00), None, Some("LGA")),
            ],
        );
        let stats = AnalyticsEngine::new().driver_stats(&[record]);

        assert_eq!(stats[0].total_trips, 5);
        assert_eq!(stats[0].completed_trips, 3);
        assert_eq!(stats[0].cancelled_trips, 1);
        assert_eq!(stats[0].total_revenue, dec!(235.00));
        assert_eq!(stats[0].average_rating, dec!(4.3));
        assert_eq!(stats[0].vehicle.plate, "ABC123");
        assert_eq!(stats[0].tags, vec!["vip".to_string()]);
    }

    #[test]
    fn test_driver_overview_without_trips() {
        let overview = AnalyticsEngine::new().driver_overview(&[driver("Sam", false, vec![])]);
        assert_eq!(overview[0].total_trips, 0);
        assert_eq!(overview[0].rating, Decimal::ZERO);
        assert!(!overview[0].driver_profile.is_active);
    }

    #[test]
    fn test_driver_overview_rating_is_unrounded_mean() {
        let trips = vec![
            trip(TripStatus::Completed, dec!(85), Some(5), Some("JFK")),
            trip(TripStatus::Completed, dec!(85), Some(4), Some("JFK")),
            trip(TripStatus::Completed, dec!(85), Some(4), Some("JFK")),
            trip(TripStatus::Scheduled, dec!(85), None, Some("JFK")),
        ];
        let overview = AnalyticsEngine::new().driver_overview(&[driver("Sam", true, trips)]);
        assert_eq!(overview[0].total_trips, 4);
        assert_eq!(overview[0].rating, Decimal::from(13) / Decimal::from(3));
    }

    #[test]
    fn test_driver_dashboard_rounds_to_one_decimal() {
        let stats = AnalyticsEngine::new().driver_dashboard(2, &[5, 4, 4]);
        assert_eq!(stats.today_trips, 2);
        assert_eq!(stats.average_rating, dec!(4.3));

        let empty = AnalyticsEngine::new().driver_dashboard(0, &[]);
        assert_eq!(empty.average_rating, Decimal::ZERO);
    }
}
