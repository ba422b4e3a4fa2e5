//! # Ridebook Web Server
//!
//! The JSON API behind the customer, driver and admin dashboards.
//!
//! Every authenticated route takes an `Authorization: Bearer <token>` header.
//! Role-gated routes use the `CustomerSession`, `DriverSession` and
//! `AdminSession` extractors, which reject with 401 when the token is missing
//! or invalid and 403 when it belongs to another role.

use axum::{
    http::HeaderValue,
    routing::{delete, get, patch, post, put},
    Router,
};
use configuration::Settings;
use core_types::FareTable;
use database::DbRepository;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod extract;
pub mod handlers;
pub mod session;

use auth::SessionKeys;
use handlers::{admin, customer, driver, sessions};

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
    pub sessions: SessionKeys,
    pub fares: FareTable,
}

impl AppState {
    pub fn from_settings(db_repo: DbRepository, settings: &Settings) -> Self {
        Self {
            db_repo,
            sessions: SessionKeys::new(
                &settings.auth.session_secret,
                chrono::Duration::hours(settings.auth.session_ttl_hours),
            ),
            fares: settings.pricing.fare_table(),
        }
    }
}

fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let origin = match allow_origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        Some(origin) => AllowOrigin::exact(origin),
        None => AllowOrigin::any(),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the full `/api` router.
pub fn build_router(state: Arc<AppState>, cors_allow_origin: Option<&str>) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(sessions::signup))
        .route("/login", post(sessions::login))
        .route("/session", get(sessions::current_session))
        .route("/switch-role", post(sessions::switch_role));

    let customer_routes = Router::new()
        .route("/", post(customer::create_trip))
        .route("/upcoming", get(customer::upcoming_trips))
        .route("/past", get(customer::past_trips))
        .route("/:id", get(customer::trip_details))
        .route("/:id/rating", post(customer::rate_trip))
        .route("/:id/cancel", post(customer::cancel_trip));

    let driver_routes = Router::new()
        .route("/trips", get(driver::assigned_trips))
        .route("/stats", get(driver::dashboard_stats))
        .route("/trips/:id/status", patch(driver::update_trip_status))
        .route("/availability", patch(driver::set_availability));

    let admin_routes = Router::new()
        .route("/drivers", get(admin::list_drivers).post(admin::create_driver))
        .route("/drivers/stats", get(admin::driver_stats))
        .route(
            "/drivers/:id",
            patch(admin::update_driver).delete(admin::delete_driver),
        )
        .route("/drivers/:id/status", patch(admin::set_driver_status))
        .route("/drivers/:id/tags", post(admin::add_driver_tag))
        .route("/drivers/:id/tags/:tag", delete(admin::remove_driver_tag))
        .route("/trips", get(admin::list_trips))
        .route("/trips/:id/status", patch(admin::update_trip_status))
        .route(
            "/trips/:id/driver",
            put(admin::assign_driver).delete(admin::unassign_driver),
        )
        .route("/stats", get(admin::dashboard_stats))
        .route("/destinations", get(admin::popular_destinations))
        .route("/analytics", get(admin::analytics))
        .route("/promote", post(admin::promote_admin));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/trips", customer_routes)
        .nest("/api/driver", driver_routes)
        .nest("/api/admin", admin_routes)
        .with_state(state)
        .layer(cors_layer(cors_allow_origin))
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Connects to the database, applies migrations and serves the API until
/// the process is stopped.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let addr = settings.server.socket_addr()?;

    let db_pool = database::connect(&settings.database).await?;
    database::run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool);

    let app_state = Arc::new(AppState::from_settings(db_repo, settings));
    let app = build_router(app_state, settings.server.cors_allow_origin.as_deref());

    tracing::info!("Web server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
