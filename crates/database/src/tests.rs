//! Repository tests against a throwaway Postgres database per test.
//! `DATABASE_URL` must point at a server the test user may create databases on.

use crate::{DbError, DbRepository};
use chrono::{Duration, Utc};
use core_types::{DriverUpdate, NewDriver, NewTrip, TripStatus, TripType};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

async fn customer(repo: &DbRepository, email: &str) -> Uuid {
    repo.create_customer(email, "$argon2id$test", "Casey Customer")
        .await
        .unwrap()
        .id
}

fn new_driver(email: &str) -> NewDriver {
    NewDriver {
        email: email.to_string(),
        password: "secret123".to_string(),
        full_name: "Dana Driver".to_string(),
        phone_number: Some("+1 555 0100".to_string()),
        license_number: "D-1234567".to_string(),
        vehicle_make: "Toyota".to_string(),
        vehicle_model: "Camry".to_string(),
        vehicle_year: 2021,
        vehicle_color: "Black".to_string(),
        vehicle_plate: "RIDE-42".to_string(),
    }
}

async fn driver(repo: &DbRepository, email: &str) -> Uuid {
    let (profile, _) = repo
        .create_driver(&new_driver(email), "$argon2id$test")
        .await
        .unwrap();
    profile.id
}

async fn book(repo: &DbRepository, customer_id: Uuid) -> Uuid {
    let trip = NewTrip {
        trip_type: TripType::AirportPickup,
        pickup_time: Utc::now() + Duration::days(1),
        pickup_location: "JFK Terminal 4".to_string(),
        dropoff_location: Some("12 Main St".to_string()),
        flight_number: Some("BA117".to_string()),
        hours: None,
    };
    repo.create_trip(customer_id, &trip, Decimal::new(8500, 2))
        .await
        .unwrap()
        .trip
        .id
}

async fn start(repo: &DbRepository, trip_id: Uuid, driver_id: Uuid) {
    repo.assign_driver(trip_id, driver_id).await.unwrap();
    repo.set_trip_status(trip_id, TripStatus::Scheduled, TripStatus::EnRoute, Some(driver_id))
        .await
        .unwrap();
}

async fn complete(repo: &DbRepository, trip_id: Uuid, driver_id: Uuid) {
    start(repo, trip_id, driver_id).await;
    repo.set_trip_status(trip_id, TripStatus::EnRoute, TripStatus::Completed, Some(driver_id))
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_is_a_conflict(pool: PgPool) {
    let repo = DbRepository::new(pool);
    customer(&repo, "casey@example.com").await;

    let err = repo
        .create_customer("casey@example.com", "$argon2id$test", "Another Casey")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_trip_is_rated_once_and_only_after_completion(pool: PgPool) {
    let repo = DbRepository::new(pool);
    let owner = customer(&repo, "owner@example.com").await;
    let stranger = customer(&repo, "stranger@example.com").await;
    let driver_id = driver(&repo, "driver@example.com").await;
    let trip_id = book(&repo, owner).await;

    let err = repo.rate_trip(owner, trip_id, 5).await.unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)));

    complete(&repo, trip_id, driver_id).await;

    let err = repo.rate_trip(stranger, trip_id, 5).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound("Trip")));

    let rated = repo.rate_trip(owner, trip_id, 4).await.unwrap();
    assert_eq!(rated.rating, Some(4));
    assert!(rated.reviewed);

    let err = repo.rate_trip(owner, trip_id, 1).await.unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)));
    assert_eq!(repo.get_trip(trip_id).await.unwrap().rating, Some(4));

    let err = repo.rate_trip(owner, Uuid::new_v4(), 5).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound("Trip")));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_scheduled_trips_can_be_cancelled(pool: PgPool) {
    let repo = DbRepository::new(pool);
    let owner = customer(&repo, "owner@example.com").await;
    let stranger = customer(&repo, "stranger@example.com").await;
    let driver_id = driver(&repo, "driver@example.com").await;

    let scheduled = book(&repo, owner).await;
    let err = repo.cancel_trip(stranger, scheduled, "Plans changed").await.unwrap_err();
    assert!(matches!(err, DbError::NotFound("Trip")));

    let cancelled = repo.cancel_trip(owner, scheduled, "Plans changed").await.unwrap();
    assert_eq!(cancelled.status, TripStatus::Cancelled);
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Plans changed"));

    let err = repo.cancel_trip(owner, scheduled, "Again").await.unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)));

    let en_route = book(&repo, owner).await;
    start(&repo, en_route, driver_id).await;
    let err = repo.cancel_trip(owner, en_route, "Too late").await.unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)));
    assert_eq!(repo.get_trip(en_route).await.unwrap().status, TripStatus::EnRoute);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_driver_status_change_is_scoped_and_guarded(pool: PgPool) {
    let repo = DbRepository::new(pool);
    let owner = customer(&repo, "owner@example.com").await;
    let assigned = driver(&repo, "assigned@example.com").await;
    let other = driver(&repo, "other@example.com").await;
    let trip_id = book(&repo, owner).await;
    start(&repo, trip_id, assigned).await;

    let err = repo
        .set_trip_status(trip_id, TripStatus::EnRoute, TripStatus::Completed, Some(other))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound("Trip")));

    // Stale expected state: the trip already left `scheduled`.
    let err = repo
        .set_trip_status(trip_id, TripStatus::Scheduled, TripStatus::EnRoute, Some(assigned))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)));

    let err = repo
        .set_trip_status(trip_id, TripStatus::EnRoute, TripStatus::Scheduled, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Core(_)));

    let done = repo
        .set_trip_status(trip_id, TripStatus::EnRoute, TripStatus::Completed, Some(assigned))
        .await
        .unwrap();
    assert_eq!(done.status, TripStatus::Completed);
    assert!(done.dropoff_time.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_assign_driver_requires_an_active_driver_and_scheduled_trip(pool: PgPool) {
    let repo = DbRepository::new(pool);
    let owner = customer(&repo, "owner@example.com").await;
    let active = driver(&repo, "active@example.com").await;
    let resting = driver(&repo, "resting@example.com").await;
    repo.set_driver_active(resting, false).await.unwrap();
    let trip_id = book(&repo, owner).await;

    let err = repo.assign_driver(trip_id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound("Driver")));

    let err = repo.assign_driver(trip_id, resting).await.unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)));

    let err = repo.assign_driver(Uuid::new_v4(), active).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound("Trip")));

    let trip = repo.assign_driver(trip_id, active).await.unwrap();
    assert_eq!(trip.driver_id, Some(active));

    repo.set_trip_status(trip_id, TripStatus::Scheduled, TripStatus::EnRoute, Some(active))
        .await
        .unwrap();
    let other = driver(&repo, "other@example.com").await;
    let err = repo.assign_driver(trip_id, other).await.unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unassign_resets_unfinished_trip(pool: PgPool) {
    let repo = DbRepository::new(pool);
    let owner = customer(&repo, "owner@example.com").await;
    let driver_id = driver(&repo, "driver@example.com").await;
    let trip_id = book(&repo, owner).await;

    let err = repo.unassign_driver(trip_id).await.unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)));

    start(&repo, trip_id, driver_id).await;
    let trip = repo.unassign_driver(trip_id).await.unwrap();
    assert_eq!(trip.driver_id, None);
    assert_eq!(trip.status, TripStatus::Scheduled);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_driver_releases_unfinished_trips(pool: PgPool) {
    let repo = DbRepository::new(pool);
    let owner = customer(&repo, "owner@example.com").await;
    let driver_id = driver(&repo, "driver@example.com").await;

    let scheduled = book(&repo, owner).await;
    repo.assign_driver(scheduled, driver_id).await.unwrap();
    let en_route = book(&repo, owner).await;
    start(&repo, en_route, driver_id).await;
    let completed = book(&repo, owner).await;
    complete(&repo, completed, driver_id).await;

    assert_eq!(repo.delete_driver(driver_id).await.unwrap(), 2);

    for trip_id in [scheduled, en_route] {
        let trip = repo.get_trip(trip_id).await.unwrap();
        assert_eq!(trip.status, TripStatus::Scheduled);
        assert_eq!(trip.driver_id, None);
    }
    assert_eq!(
        repo.get_trip(completed).await.unwrap().status,
        TripStatus::Completed
    );

    assert!(matches!(
        repo.delete_driver(driver_id).await.unwrap_err(),
        DbError::NotFound("Driver")
    ));
    assert!(matches!(
        repo.delete_driver(owner).await.unwrap_err(),
        DbError::NotFound("Driver")
    ));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_promoted_driver_can_still_be_deleted(pool: PgPool) {
    let repo = DbRepository::new(pool);
    let driver_id = driver(&repo, "driver@example.com").await;
    repo.promote_to_admin("driver@example.com").await.unwrap();

    assert_eq!(repo.delete_driver(driver_id).await.unwrap(), 0);
    assert!(repo.find_credentials("driver@example.com").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_driver_tags_are_normalized_and_idempotent(pool: PgPool) {
    let repo = DbRepository::new(pool);
    let driver_id = driver(&repo, "driver@example.com").await;

    assert_eq!(repo.add_driver_tag(driver_id, "  VIP ").await.unwrap(), "vip");
    assert_eq!(repo.add_driver_tag(driver_id, "vip").await.unwrap(), "vip");

    let drivers = repo.list_drivers().await.unwrap();
    assert_eq!(drivers.len(), 1);
    assert_eq!(drivers[0].tags, vec!["vip".to_string()]);

    assert!(repo.remove_driver_tag(driver_id, "VIP").await.unwrap());
    assert!(!repo.remove_driver_tag(driver_id, "vip").await.unwrap());

    let err = repo.add_driver_tag(Uuid::new_v4(), "vip").await.unwrap_err();
    assert!(matches!(err, DbError::NotFound("Driver")));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_driver_keeps_absent_fields(pool: PgPool) {
    let repo = DbRepository::new(pool);
    let driver_id = driver(&repo, "driver@example.com").await;

    let update = DriverUpdate {
        full_name: Some("Dana D. Driver".to_string()),
        vehicle_color: Some("Blue".to_string()),
        ..DriverUpdate::default()
    };
    let profile = repo.update_driver(driver_id, &update).await.unwrap();
    assert_eq!(profile.vehicle_color, "Blue");
    assert_eq!(profile.vehicle_make, "Toyota");
    assert_eq!(profile.vehicle_plate, "RIDE-42");
    assert_eq!(profile.vehicle_year, 2021);
    assert!(profile.is_active);

    let user = repo.get_profile(driver_id).await.unwrap();
    assert_eq!(user.full_name, "Dana D. Driver");
    assert_eq!(user.phone_number.as_deref(), Some("+1 555 0100"));

    let err = repo.update_driver(Uuid::new_v4(), &update).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound("Driver")));
}
