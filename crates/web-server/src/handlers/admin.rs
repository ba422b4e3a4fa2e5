use super::hash_off_thread;
use crate::{
    error::AppError,
    extract::{ApiJson, ApiPath, ApiQuery},
    session::AdminSession,
    AppState,
};
use analytics::{AdminAnalytics, AdminStats, AnalyticsEngine, DriverOverview, DriverStats, PopularDestination};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use core_types::{
    normalize_email, CoreError, DriverProfile, DriverUpdate, NewDriver, Role, Timeframe, Trip,
    TripFilter, TripStatus, TripWithParties, UserProfile,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

const TOP_DESTINATIONS: usize = 5;
const RECENT_REVIEWS: i64 = 6;

#[derive(Debug, Deserialize)]
pub struct TimeframeQuery {
    #[serde(default)]
    pub timeframe: Timeframe,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: TripStatus,
}

#[derive(Debug, Deserialize)]
pub struct ActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct TagRequest {
    pub tag: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct PromoteRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedDriver {
    pub user: UserProfile,
    pub driver_profile: DriverProfile,
}

// ---------------------------------------------------------------------------
// Drivers
// ---------------------------------------------------------------------------

/// # GET /api/admin/drivers
pub async fn list_drivers(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> Result<Json<Vec<DriverOverview>>, AppError> {
    let drivers = state.db_repo.list_drivers().await?;
    Ok(Json(AnalyticsEngine::new().driver_overview(&drivers)))
}

/// # POST /api/admin/drivers
pub async fn create_driver(
    State(state): State<Arc<AppState>>,
    AdminSession(admin): AdminSession,
    ApiJson(input): ApiJson<NewDriver>,
) -> Result<(StatusCode, Json<CreatedDriver>), AppError> {
    let input = input.validated(Utc::now())?;
    let password_hash = hash_off_thread(input.password.clone()).await?;
    let (user, driver_profile) = state.db_repo.create_driver(&input, &password_hash).await?;

    tracing::info!(admin_id = %admin.sub, driver_id = %user.id, "Driver provisioned");
    Ok((StatusCode::CREATED, Json(CreatedDriver { user, driver_profile })))
}

/// # PATCH /api/admin/drivers/:id
pub async fn update_driver(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    ApiPath(driver_id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<DriverUpdate>,
) -> Result<Json<DriverProfile>, AppError> {
    let update = update.validated(Utc::now())?;
    if update.is_empty() {
        return Err(CoreError::validation("body", "No changes were supplied").into());
    }
    Ok(Json(state.db_repo.update_driver(driver_id, &update).await?))
}

/// # DELETE /api/admin/drivers/:id
/// Unfinished trips of the driver go back to the unassigned pool.
pub async fn delete_driver(
    State(state): State<Arc<AppState>>,
    AdminSession(admin): AdminSession,
    ApiPath(driver_id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    let reassigned = state.db_repo.delete_driver(driver_id).await?;
    tracing::info!(admin_id = %admin.sub, %driver_id, reassigned, "Driver removed");
    Ok(Json(json!({
        "message": "Driver deleted successfully",
        "reassigned_trips": reassigned,
    })))
}

/// # PATCH /api/admin/drivers/:id/status
pub async fn set_driver_status(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    ApiPath(driver_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<ActiveRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .db_repo
        .set_driver_active(driver_id, request.is_active)
        .await?;
    Ok(Json(json!({ "id": driver_id, "is_active": request.is_active })))
}

/// # GET /api/admin/drivers/stats
pub async fn driver_stats(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> Result<Json<Vec<DriverStats>>, AppError> {
    let drivers = state.db_repo.list_drivers().await?;
    Ok(Json(AnalyticsEngine::new().driver_stats(&drivers)))
}

/// # POST /api/admin/drivers/:id/tags
pub async fn add_driver_tag(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    ApiPath(driver_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<TagRequest>,
) -> Result<Json<Value>, AppError> {
    let tag = state.db_repo.add_driver_tag(driver_id, &request.tag).await?;
    Ok(Json(json!({ "driver_id": driver_id, "tag": tag })))
}

/// # DELETE /api/admin/drivers/:id/tags/:tag
pub async fn remove_driver_tag(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    ApiPath((driver_id, tag)): ApiPath<(Uuid, String)>,
) -> Result<Json<Value>, AppError> {
    let removed = state.db_repo.remove_driver_tag(driver_id, &tag).await?;
    Ok(Json(json!({ "removed": removed })))
}

// ---------------------------------------------------------------------------
// Trips
// ---------------------------------------------------------------------------

/// # GET /api/admin/trips?status=&from=&to=
pub async fn list_trips(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    ApiQuery(filter): ApiQuery<TripFilter>,
) -> Result<Json<Vec<TripWithParties>>, AppError> {
    let filter = filter.validated()?;
    Ok(Json(state.db_repo.list_all_trips(&filter).await?))
}

/// # PATCH /api/admin/trips/:id/status
pub async fn update_trip_status(
    State(state): State<Arc<AppState>>,
    AdminSession(admin): AdminSession,
    ApiPath(trip_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<StatusRequest>,
) -> Result<Json<Trip>, AppError> {
    let trip = state.db_repo.get_trip(trip_id).await?;
    trip.status.transition_to(request.status)?;

    let updated = state
        .db_repo
        .set_trip_status(trip_id, trip.status, request.status, None)
        .await?;
    tracing::info!(admin_id = %admin.sub, %trip_id, status = %updated.status, "Admin changed trip status");
    Ok(Json(updated))
}

/// # PUT /api/admin/trips/:id/driver
pub async fn assign_driver(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    ApiPath(trip_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<AssignDriverRequest>,
) -> Result<Json<Trip>, AppError> {
    Ok(Json(state.db_repo.assign_driver(trip_id, request.driver_id).await?))
}

/// # DELETE /api/admin/trips/:id/driver
pub async fn unassign_driver(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    ApiPath(trip_id): ApiPath<Uuid>,
) -> Result<Json<Trip>, AppError> {
    Ok(Json(state.db_repo.unassign_driver(trip_id).await?))
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// # GET /api/admin/stats?timeframe=
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    ApiQuery(query): ApiQuery<TimeframeQuery>,
) -> Result<Json<AdminStats>, AppError> {
    let start = query.timeframe.start_from(Utc::now());
    let trips = state.db_repo.trip_facts_since(start).await?;
    let active_drivers = state.db_repo.count_active_drivers().await?;
    Ok(Json(AnalyticsEngine::new().admin_stats(&trips, active_drivers)))
}

/// # GET /api/admin/destinations?timeframe=
pub async fn popular_destinations(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    ApiQuery(query): ApiQuery<TimeframeQuery>,
) -> Result<Json<Vec<PopularDestination>>, AppError> {
    let start = query.timeframe.start_from(Utc::now());
    let trips = state.db_repo.trip_facts_since(start).await?;
    Ok(Json(
        AnalyticsEngine::new().popular_destinations(&trips, TOP_DESTINATIONS),
    ))
}

/// # GET /api/admin/analytics?timeframe=
pub async fn analytics(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    ApiQuery(query): ApiQuery<TimeframeQuery>,
) -> Result<Json<AdminAnalytics>, AppError> {
    let start = query.timeframe.start_from(Utc::now());
    let trips = state.db_repo.trip_facts_since(start).await?;
    let total_drivers = state.db_repo.count_profiles_by_role(Role::Driver).await?;
    let total_customers = state.db_repo.count_profiles_by_role(Role::Customer).await?;
    let reviews = state.db_repo.recent_reviews(RECENT_REVIEWS).await?;

    Ok(Json(AnalyticsEngine::new().admin_analytics(
        &trips,
        total_drivers,
        total_customers,
        &reviews,
    )))
}

/// # POST /api/admin/promote
pub async fn promote_admin(
    State(state): State<Arc<AppState>>,
    AdminSession(admin): AdminSession,
    ApiJson(request): ApiJson<PromoteRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state
        .db_repo
        .promote_to_admin(&normalize_email(&request.email))
        .await?;
    tracing::info!(admin_id = %admin.sub, promoted = %profile.id, "Promoted account to admin");
    Ok(Json(profile))
}
