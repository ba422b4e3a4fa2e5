use super::{hash_off_thread, verify_off_thread};
use crate::{
    error::AppError,
    extract::ApiJson,
    session::Session,
    AppState,
};
use auth::{redirect_path, resolve_login_role, resolve_role_switch, AuthError, SessionClaims};
use axum::{extract::State, http::StatusCode, Json};
use core_types::{normalize_email, Role, SignupInput, UserProfile};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// The dashboard the user asked for. Defaults to the stored role.
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct SwitchRoleRequest {
    pub role: Role,
}

/// A fresh session and where to send the user with it.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub role: Role,
    pub redirect: &'static str,
    pub user: UserProfile,
}

/// # POST /api/auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<SignupInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let input = input.validated()?;
    let password_hash = hash_off_thread(input.password).await?;
    state
        .db_repo
        .create_customer(&input.email, &password_hash, &input.name)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Account created successfully. Please sign in." })),
    ))
}

/// # POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let email = normalize_email(&request.email);
    let credentials = state
        .db_repo
        .find_credentials(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_off_thread(request.password, credentials.password_hash).await? {
        tracing::info!(user_id = %credentials.user_id, "Rejected sign-in with a wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let profile = state.db_repo.get_profile(credentials.user_id).await?;
    let role = resolve_login_role(profile.role, request.role)?;
    let token = state.sessions.issue(&profile, role)?;

    tracing::info!(user_id = %profile.id, %role, "Signed in");
    Ok(Json(SessionResponse {
        token,
        role,
        redirect: redirect_path(role),
        user: profile,
    }))
}

/// # GET /api/auth/session
pub async fn current_session(Session(claims): Session) -> Json<SessionClaims> {
    Json(claims)
}

/// # POST /api/auth/switch-role
pub async fn switch_role(
    State(state): State<Arc<AppState>>,
    Session(claims): Session,
    ApiJson(request): ApiJson<SwitchRoleRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let profile = state.db_repo.get_profile(claims.sub).await?;
    let role = resolve_role_switch(profile.role, request.role)?;
    let token = state.sessions.issue(&profile, role)?;

    tracing::info!(user_id = %profile.id, from = %claims.role, to = %role, "Switched role");
    Ok(Json(SessionResponse {
        token,
        role,
        redirect: redirect_path(role),
        user: profile,
    }))
}
