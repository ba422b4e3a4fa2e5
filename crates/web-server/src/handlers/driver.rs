use crate::{
    error::AppError,
    extract::{ApiJson, ApiPath},
    session::DriverSession,
    AppState,
};
use analytics::{AnalyticsEngine, DriverDashboardStats};
use axum::{
    extract::State,
    Json,
};
use chrono::{NaiveTime, Utc};
use core_types::{Trip, TripStatus, TripWithParties};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: TripStatus,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub is_active: bool,
}

/// # GET /api/driver/trips
pub async fn assigned_trips(
    State(state): State<Arc<AppState>>,
    DriverSession(claims): DriverSession,
) -> Result<Json<Vec<TripWithParties>>, AppError> {
    Ok(Json(state.db_repo.driver_trips(claims.sub).await?))
}

/// # GET /api/driver/stats
/// Completed trips since midnight UTC and the lifetime average rating.
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    DriverSession(claims): DriverSession,
) -> Result<Json<DriverDashboardStats>, AppError> {
    let today_start = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    let (today_trips, ratings) = state
        .db_repo
        .driver_dashboard_facts(claims.sub, today_start)
        .await?;
    Ok(Json(AnalyticsEngine::new().driver_dashboard(today_trips, &ratings)))
}

/// # PATCH /api/driver/trips/:id/status
pub async fn update_trip_status(
    State(state): State<Arc<AppState>>,
    DriverSession(claims): DriverSession,
    ApiPath(trip_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<StatusRequest>,
) -> Result<Json<Trip>, AppError> {
    let trip = state.db_repo.get_trip(trip_id).await?;
    if trip.driver_id != Some(claims.sub) {
        return Err(AppError::NotFound("Trip not found".to_string()));
    }
    trip.status.transition_to(request.status)?;

    let updated = state
        .db_repo
        .set_trip_status(trip_id, trip.status, request.status, Some(claims.sub))
        .await?;
    Ok(Json(updated))
}

/// # PATCH /api/driver/availability
pub async fn set_availability(
    State(state): State<Arc<AppState>>,
    DriverSession(claims): DriverSession,
    ApiJson(request): ApiJson<AvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .db_repo
        .set_driver_active(claims.sub, request.is_active)
        .await?;
    Ok(Json(json!({ "is_active": request.is_active })))
}
