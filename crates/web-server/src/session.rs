use crate::{error::AppError, AppState};
use auth::SessionClaims;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use core_types::Role;
use std::sync::Arc;

/// Any signed-in user.
#[derive(Debug, Clone)]
pub struct Session(pub SessionClaims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized)?;
        let claims = state.sessions.verify(bearer.token())?;
        Ok(Session(claims))
    }
}

/// Declares an extractor that admits only sessions acting as `$role`.
macro_rules! role_session {
    ($name:ident, $role:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub SessionClaims);

        #[async_trait]
        impl FromRequestParts<Arc<AppState>> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &Arc<AppState>,
            ) -> Result<Self, Self::Rejection> {
                let Session(claims) = Session::from_request_parts(parts, state).await?;
                if claims.role != $role {
                    tracing::debug!(user_id = %claims.sub, role = %claims.role, "Role not allowed here");
                    return Err(AppError::Forbidden(format!(
                        "This area is only available to {} accounts",
                        $role
                    )));
                }
                Ok($name(claims))
            }
        }
    };
}

role_session!(CustomerSession, Role::Customer);
role_session!(DriverSession, Role::Driver);
role_session!(AdminSession, Role::Admin);
