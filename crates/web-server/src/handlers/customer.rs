use crate::{
    error::AppError,
    extract::{ApiJson, ApiPath},
    session::CustomerSession,
    AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use core_types::{check_cancellation_reason, check_rating, NewTrip, Trip, TripWithParties};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: i16,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub reason: String,
}

/// # POST /api/trips
/// Books a trip. The fare is quoted server-side from the configured table.
pub async fn create_trip(
    State(state): State<Arc<AppState>>,
    CustomerSession(claims): CustomerSession,
    ApiJson(trip): ApiJson<NewTrip>,
) -> Result<(StatusCode, Json<TripWithParties>), AppError> {
    let trip = trip.validated(Utc::now())?;
    let cost = state.fares.quote(&trip);
    let booked = state.db_repo.create_trip(claims.sub, &trip, cost).await?;
    Ok((StatusCode::CREATED, Json(booked)))
}

/// # GET /api/trips/upcoming
pub async fn upcoming_trips(
    State(state): State<Arc<AppState>>,
    CustomerSession(claims): CustomerSession,
) -> Result<Json<Vec<TripWithParties>>, AppError> {
    Ok(Json(state.db_repo.upcoming_trips(claims.sub).await?))
}

/// # GET /api/trips/past
pub async fn past_trips(
    State(state): State<Arc<AppState>>,
    CustomerSession(claims): CustomerSession,
) -> Result<Json<Vec<TripWithParties>>, AppError> {
    Ok(Json(state.db_repo.past_trips(claims.sub).await?))
}

/// # GET /api/trips/:id
pub async fn trip_details(
    State(state): State<Arc<AppState>>,
    CustomerSession(claims): CustomerSession,
    ApiPath(trip_id): ApiPath<Uuid>,
) -> Result<Json<TripWithParties>, AppError> {
    Ok(Json(state.db_repo.trip_details(claims.sub, trip_id).await?))
}

/// # POST /api/trips/:id/rating
pub async fn rate_trip(
    State(state): State<Arc<AppState>>,
    CustomerSession(claims): CustomerSession,
    ApiPath(trip_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<RatingRequest>,
) -> Result<Json<Trip>, AppError> {
    let rating = check_rating(request.rating)?;
    Ok(Json(state.db_repo.rate_trip(claims.sub, trip_id, rating).await?))
}

/// # POST /api/trips/:id/cancel
pub async fn cancel_trip(
    State(state): State<Arc<AppState>>,
    CustomerSession(claims): CustomerSession,
    ApiPath(trip_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<CancelRequest>,
) -> Result<Json<Trip>, AppError> {
    let reason = check_cancellation_reason(&request.reason)?;
    Ok(Json(state.db_repo.cancel_trip(claims.sub, trip_id, &reason).await?))
}
