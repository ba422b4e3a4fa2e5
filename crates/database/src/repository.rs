use crate::error::DbError;
use crate::rows::{DriverAccountRow, ReviewRow, TripFactRow, TripRow, TRIP_WITH_PARTIES};
use analytics::{DriverRecord, ReviewFact, TripFact};
use chrono::{DateTime, Utc};
use core_types::{
    normalize_tag, DriverProfile, DriverTag, DriverUpdate, NewDriver, NewTrip, Role, Trip,
    TripFilter, TripStatus, TripWithParties, UserProfile,
};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{FromRow, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

/// Which parties of a trip the caller may see. Customers see their driver,
/// drivers see their customer, admins see both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Customer,
    Driver,
    Admin,
}

/// Login material for an account.
#[derive(Debug, Clone, FromRow)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
}

/// Who a conditional trip write was scoped to, used to tell a missing trip
/// from one in the wrong state.
#[derive(Debug, Clone, Copy)]
enum Scope {
    Customer(Uuid),
    Driver(Uuid),
    Any,
}

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---------------------------------------------------------------------
    // Accounts
    // ---------------------------------------------------------------------

    /// Inserts the auth user and its customer profile in one transaction.
    pub async fn create_customer(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
    ) -> Result<UserProfile, DbError> {
        let mut tx = self.pool.begin().await?;
        let profile =
            insert_account(&mut tx, email, password_hash, full_name, None, Role::Customer).await?;
        tx.commit().await?;

        tracing::info!(user_id = %profile.id, "Customer account created");
        Ok(profile)
    }

    pub async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, DbError> {
        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id AS user_id, password_hash FROM auth_users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(credentials)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserProfile, DbError> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound("Profile"))
    }

    pub async fn find_profile_by_email(&self, email: &str) -> Result<UserProfile, DbError> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound("Profile"))
    }

    pub async fn promote_to_admin(&self, email: &str) -> Result<UserProfile, DbError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "UPDATE user_profiles SET role = 'admin', updated_at = NOW() WHERE email = $1 RETURNING *",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound("Profile"))?;

        tracing::info!(user_id = %profile.id, "Account promoted to admin");
        Ok(profile)
    }

    // ---------------------------------------------------------------------
    // Drivers
    // ---------------------------------------------------------------------

    /// Provisions a driver: auth user, driver-role profile and an active
    /// driver profile, all or nothing.
    pub async fn create_driver(
        &self,
        driver: &NewDriver,
        password_hash: &str,
    ) -> Result<(UserProfile, DriverProfile), DbError> {
        let mut tx = self.pool.begin().await?;
        let profile = insert_account(
            &mut tx,
            &driver.email,
            password_hash,
            &driver.full_name,
            driver.phone_number.as_deref(),
            Role::Driver,
        )
        .await?;

        let driver_profile = sqlx::query_as::<_, DriverProfile>(
            r#"
            INSERT INTO driver_profiles
                (user_id, license_number, vehicle_make, vehicle_model, vehicle_year, vehicle_color, vehicle_plate, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
            RETURNING *
            "#,
        )
        .bind(profile.id)
        .bind(&driver.license_number)
        .bind(&driver.vehicle_make)
        .bind(&driver.vehicle_model)
        .bind(driver.vehicle_year)
        .bind(&driver.vehicle_color)
        .bind(&driver.vehicle_plate)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(driver_id = %profile.id, "Driver account created");
        Ok((profile, driver_profile))
    }

    /// Applies the present fields of `update`; absent fields keep their value.
    pub async fn update_driver(
        &self,
        driver_id: Uuid,
        update: &DriverUpdate,
    ) -> Result<DriverProfile, DbError> {
        let mut tx = self.pool.begin().await?;

        let driver_profile = sqlx::query_as::<_, DriverProfile>(
            r#"
            UPDATE driver_profiles SET
                license_number = COALESCE($2, license_number),
                vehicle_make   = COALESCE($3, vehicle_make),
                vehicle_model  = COALESCE($4, vehicle_model),
                vehicle_year   = COALESCE($5, vehicle_year),
                vehicle_color  = COALESCE($6, vehicle_color),
                vehicle_plate  = COALESCE($7, vehicle_plate),
                is_active      = COALESCE($8, is_active),
                updated_at     = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(driver_id)
        .bind(update.license_number.as_deref())
        .bind(update.vehicle_make.as_deref())
        .bind(update.vehicle_model.as_deref())
        .bind(update.vehicle_year)
        .bind(update.vehicle_color.as_deref())
        .bind(update.vehicle_plate.as_deref())
        .bind(update.is_active)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::NotFound("Driver"))?;

        if update.touches_user_profile() {
            sqlx::query(
                r#"
                UPDATE user_profiles SET
                    full_name    = COALESCE($2, full_name),
                    phone_number = COALESCE($3, phone_number),
                    updated_at   = NOW()
                WHERE id = $1
                "#,
            )
            .bind(driver_id)
            .bind(update.full_name.as_deref())
            .bind(update.phone_number.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(driver_profile)
    }

    /// Deletes a driver account, whatever role it currently holds. Trips the
    /// driver had not finished go back to the unassigned pool. Returns how many trips were reassigned.
    pub async fn delete_driver(&self, driver_id: Uuid) -> Result<u64, DbError> {
        let mut tx = self.pool.begin().await?;

        let is_driver: Option<bool> =
            sqlx::query_scalar("SELECT TRUE FROM driver_profiles WHERE user_id = $1")
                .bind(driver_id)
                .fetch_optional(&mut *tx)
                .await?;
        if is_driver.is_none() {
            return Err(DbError::NotFound("Driver"));
        }

        let reassigned = sqlx::query(
            r#"
            UPDATE trips SET driver_id = NULL, status = 'scheduled', updated_at = NOW()
            WHERE driver_id = $1 AND status IN ('scheduled', 'en-route')
            "#,
        )
        .bind(driver_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query("DELETE FROM auth_users WHERE id = $1")
            .bind(driver_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(%driver_id, reassigned, "Driver account deleted");
        Ok(reassigned)
    }

    pub async fn set_driver_active(&self, driver_id: Uuid, is_active: bool) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE driver_profiles SET is_active = $2, updated_at = NOW() WHERE user_id = $1",
        )
        .bind(driver_id)
        .bind(is_active)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Driver"));
        }
        Ok(())
    }

    /// Every driver with its profile, tags and trip facts, ordered by name.
    pub async fn list_drivers(&self) -> Result<Vec<DriverRecord>, DbError> {
        let accounts = sqlx::query_as::<_, DriverAccountRow>(
            r#"
            SELECT dp.*, u.full_name, u.email, u.phone_number, u.avatar_url
            FROM driver_profiles AS dp
            JOIN user_profiles AS u ON u.id = dp.user_id
            ORDER BY u.full_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let tags =
            sqlx::query_as::<_, DriverTag>("SELECT driver_id, tag FROM driver_tags ORDER BY tag ASC")
                .fetch_all(&self.pool)
                .await?;

        let trips = sqlx::query_as::<_, TripFactRow>(
            "SELECT driver_id, status, cost, rating, dropoff_location FROM trips WHERE driver_id IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tags_by_driver: HashMap<Uuid, Vec<String>> = HashMap::new();
        for DriverTag { driver_id, tag } in tags {
            tags_by_driver.entry(driver_id).or_default().push(tag);
        }
        let mut trips_by_driver: HashMap<Uuid, Vec<TripFact>> = HashMap::new();
        for row in trips {
            if let Some(driver_id) = row.driver_id {
                trips_by_driver.entry(driver_id).or_default().push(row.into());
            }
        }

        Ok(accounts
            .into_iter()
            .map(|account| {
                let id = account.profile.user_id;
                DriverRecord {
                    id,
                    full_name: account.full_name,
                    email: account.email,
                    phone_number: account.phone_number,
                    avatar_url: account.avatar_url,
                    driver_profile: account.profile,
                    tags: tags_by_driver.remove(&id).unwrap_or_default(),
                    trips: trips_by_driver.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }

    /// Attaches a tag to a driver. Adding a tag twice is a no-op.
    /// Returns the normalized tag.
    pub async fn add_driver_tag(&self, driver_id: Uuid, tag: &str) -> Result<String, DbError> {
        let tag = normalize_tag(tag)?;
        self.require_driver(driver_id).await?;

        sqlx::query(
            "INSERT INTO driver_tags (driver_id, tag) VALUES ($1, $2) ON CONFLICT (driver_id, tag) DO NOTHING",
        )
        .bind(driver_id)
        .bind(&tag)
        .execute(&self.pool)
        .await?;
        Ok(tag)
    }

    /// Returns whether the tag was present.
    pub async fn remove_driver_tag(&self, driver_id: Uuid, tag: &str) -> Result<bool, DbError> {
        let tag = normalize_tag(tag)?;
        let result = sqlx::query("DELETE FROM driver_tags WHERE driver_id = $1 AND tag = $2")
            .bind(driver_id)
            .bind(&tag)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---------------------------------------------------------------------
    // Trips
    // ---------------------------------------------------------------------

    /// Books a trip for a customer. `trip` must already be validated.
    pub async fn create_trip(
        &self,
        customer_id: Uuid,
        trip: &NewTrip,
        cost: Decimal,
    ) -> Result<TripWithParties, DbError> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips
                (id, user_id, trip_type, status, pickup_location, pickup_time, dropoff_location, flight_number, hours, cost, reviewed)
            VALUES ($1, $2, $3, 'scheduled', $4, $5, $6, $7, $8, $9, FALSE)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(customer_id)
        .bind(trip.trip_type)
        .bind(&trip.pickup_location)
        .bind(trip.pickup_time)
        .bind(trip.dropoff_location.as_deref())
        .bind(trip.flight_number.as_deref())
        .bind(trip.hours)
        .bind(cost)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(trip_id = %trip.id, %customer_id, trip_type = %trip.trip_type, "Trip booked");
        Ok(TripWithParties {
            trip,
            driver: None,
            customer: None,
        })
    }

    /// Scheduled and en-route trips of a customer, soonest first.
    pub async fn upcoming_trips(&self, customer_id: Uuid) -> Result<Vec<TripWithParties>, DbError> {
        self.fetch_views(
            "WHERE t.user_id = $1 AND t.status IN ('scheduled', 'en-route') ORDER BY t.pickup_time ASC",
            customer_id,
            Audience::Customer,
        )
        .await
    }

    /// Completed and cancelled trips of a customer, most recent first.
    pub async fn past_trips(&self, customer_id: Uuid) -> Result<Vec<TripWithParties>, DbError> {
        self.fetch_views(
            "WHERE t.user_id = $1 AND t.status IN ('completed', 'cancelled') ORDER BY t.pickup_time DESC",
            customer_id,
            Audience::Customer,
        )
        .await
    }

    pub async fn trip_details(
        &self,
        customer_id: Uuid,
        trip_id: Uuid,
    ) -> Result<TripWithParties, DbError> {
        let sql = format!("{TRIP_WITH_PARTIES} WHERE t.id = $1 AND t.user_id = $2");
        let row = sqlx::query_as::<_, TripRow>(&sql)
            .bind(trip_id)
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound("Trip"))?;
        Ok(row.into_view(Audience::Customer))
    }

    /// Records the customer's rating. A trip can be rated once, after completion.
    pub async fn rate_trip(
        &self,
        customer_id: Uuid,
        trip_id: Uuid,
        rating: i16,
    ) -> Result<Trip, DbError> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips SET rating = $3, reviewed = TRUE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = 'completed' AND rating IS NULL
            RETURNING *
            "#,
        )
        .bind(trip_id)
        .bind(customer_id)
        .bind(rating)
        .fetch_optional(&self.pool)
        .await?;

        match trip {
            Some(trip) => Ok(trip),
            None => Err(self
                .classify_miss(trip_id, Scope::Customer(customer_id), "Only completed trips that have not been rated can be rated")
                .await),
        }
    }

    pub async fn cancel_trip(
        &self,
        customer_id: Uuid,
        trip_id: Uuid,
        reason: &str,
    ) -> Result<Trip, DbError> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips SET status = 'cancelled', cancellation_reason = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = 'scheduled'
            RETURNING *
            "#,
        )
        .bind(trip_id)
        .bind(customer_id)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await?;

        match trip {
            Some(trip) => {
                tracing::info!(%trip_id, %customer_id, "Trip cancelled");
                Ok(trip)
            }
            None => Err(self
                .classify_miss(trip_id, Scope::Customer(customer_id), "Only scheduled trips can be cancelled")
                .await),
        }
    }

    /// Trips assigned to a driver, soonest first.
    pub async fn driver_trips(&self, driver_id: Uuid) -> Result<Vec<TripWithParties>, DbError> {
        self.fetch_views(
            "WHERE t.driver_id = $1 ORDER BY t.pickup_time ASC",
            driver_id,
            Audience::Driver,
        )
        .await
    }

    pub async fn get_trip(&self, trip_id: Uuid) -> Result<Trip, DbError> {
        sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
            .bind(trip_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound("Trip"))
    }

    /// Moves a trip from `from` to `to`, provided it is still in `from`.
    ///
    /// With `driver_scope` set, only a trip assigned to that driver matches.
    /// Completing a trip stamps its drop-off time.
    pub async fn set_trip_status(
        &self,
        trip_id: Uuid,
        from: TripStatus,
        to: TripStatus,
        driver_scope: Option<Uuid>,
    ) -> Result<Trip, DbError> {
        from.transition_to(to)?;

        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips SET
                status = $3,
                dropoff_time = CASE WHEN $4 THEN NOW() ELSE dropoff_time END,
                updated_at = NOW()
            WHERE id = $1 AND status = $2 AND ($5::uuid IS NULL OR driver_id = $5)
            RETURNING *
            "#,
        )
        .bind(trip_id)
        .bind(from)
        .bind(to)
        .bind(to == TripStatus::Completed)
        .bind(driver_scope)
        .fetch_optional(&self.pool)
        .await?;

        match trip {
            Some(trip) => {
                tracing::info!(%trip_id, %from, %to, "Trip status changed");
                Ok(trip)
            }
            None => {
                let scope = driver_scope.map_or(Scope::Any, Scope::Driver);
                Err(self
                    .classify_miss(trip_id, scope, "Trip status was changed by someone else")
                    .await)
            }
        }
    }

    /// Every trip matching the filter, most recent pickup first.
    pub async fn list_all_trips(&self, filter: &TripFilter) -> Result<Vec<TripWithParties>, DbError> {
        let sql = format!(
            "{TRIP_WITH_PARTIES} \
             WHERE ($1::trip_status IS NULL OR t.status = $1) \
               AND ($2::timestamptz IS NULL OR t.pickup_time >= $2) \
               AND ($3::timestamptz IS NULL OR t.pickup_time <= $3) \
             ORDER BY t.pickup_time DESC"
        );
        let rows = sqlx::query_as::<_, TripRow>(&sql)
            .bind(filter.status)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_view(Audience::Admin)).collect())
    }

    /// Assigns an active driver to a scheduled trip.
    pub async fn assign_driver(&self, trip_id: Uuid, driver_id: Uuid) -> Result<Trip, DbError> {
        let is_active: bool =
            sqlx::query_scalar("SELECT is_active FROM driver_profiles WHERE user_id = $1")
                .bind(driver_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(DbError::NotFound("Driver"))?;
        if !is_active {
            return Err(DbError::conflict("Driver is not accepting trips"));
        }

        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips SET driver_id = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'scheduled'
              AND EXISTS (SELECT 1 FROM driver_profiles WHERE user_id = $2 AND is_active)
            RETURNING *
            "#,
        )
        .bind(trip_id)
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        match trip {
            Some(trip) => {
                tracing::info!(%trip_id, %driver_id, "Driver assigned");
                Ok(trip)
            }
            None => Err(self
                .classify_miss(trip_id, Scope::Any, "Only scheduled trips can be assigned a driver")
                .await),
        }
    }

    /// Takes the driver off an unfinished trip and puts it back to scheduled.
    pub async fn unassign_driver(&self, trip_id: Uuid) -> Result<Trip, DbError> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips SET driver_id = NULL, status = 'scheduled', updated_at = NOW()
            WHERE id = $1 AND driver_id IS NOT NULL AND status IN ('scheduled', 'en-route')
            RETURNING *
            "#,
        )
        .bind(trip_id)
        .fetch_optional(&self.pool)
        .await?;

        match trip {
            Some(trip) => Ok(trip),
            None => Err(self
                .classify_miss(trip_id, Scope::Any, "Only unfinished trips with a driver can be unassigned")
                .await),
        }
    }

    // ---------------------------------------------------------------------
    // Analytics inputs
    // ---------------------------------------------------------------------

    /// Trips created at or after `start`.
    pub async fn trip_facts_since(&self, start: DateTime<Utc>) -> Result<Vec<TripFact>, DbError> {
        let rows = sqlx::query_as::<_, TripFactRow>(
            "SELECT driver_id, status, cost, rating, dropoff_location FROM trips WHERE created_at >= $1",
        )
        .bind(start)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(TripFact::from).collect())
    }

    pub async fn count_active_drivers(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM driver_profiles WHERE is_active")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_profiles_by_role(&self, role: Role) -> Result<i64, DbError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM user_profiles WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Rated trips, newest first, with the name of the driver if still known.
    pub async fn recent_reviews(&self, limit: i64) -> Result<Vec<ReviewFact>, DbError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT d.full_name AS driver_name, t.rating, t.created_at
            FROM trips AS t
            LEFT JOIN user_profiles AS d ON d.id = t.driver_id
            WHERE t.rating IS NOT NULL
            ORDER BY t.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ReviewFact::from).collect())
    }

    /// Completed trips since `today_start`, and every rating the driver received.
    pub async fn driver_dashboard_facts(
        &self,
        driver_id: Uuid,
        today_start: DateTime<Utc>,
    ) -> Result<(i64, Vec<i16>), DbError> {
        let today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM trips WHERE driver_id = $1 AND status = 'completed' AND pickup_time >= $2",
        )
        .bind(driver_id)
        .bind(today_start)
        .fetch_one(&self.pool)
        .await?;

        let ratings: Vec<i16> = sqlx::query_scalar(
            "SELECT rating FROM trips WHERE driver_id = $1 AND rating IS NOT NULL",
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok((today, ratings))
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    async fn fetch_views(
        &self,
        clause: &str,
        party_id: Uuid,
        audience: Audience,
    ) -> Result<Vec<TripWithParties>, DbError> {
        let sql = format!("{TRIP_WITH_PARTIES} {clause}");
        let rows = sqlx::query_as::<_, TripRow>(&sql)
            .bind(party_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_view(audience)).collect())
    }

    async fn require_driver(&self, driver_id: Uuid) -> Result<(), DbError> {
        let found: Option<bool> =
            sqlx::query_scalar("SELECT TRUE FROM driver_profiles WHERE user_id = $1")
                .bind(driver_id)
                .fetch_optional(&self.pool)
                .await?;
        found.map(|_| ()).ok_or(DbError::NotFound("Driver"))
    }

    /// Explains why a conditional trip write matched no row: the trip is
    /// missing or outside the caller's scope (`NotFound`), or it exists but
    /// is in the wrong state (`Conflict`).
    async fn classify_miss(&self, trip_id: Uuid, scope: Scope, conflict: &str) -> DbError {
        let parties: Result<Option<(Uuid, Option<Uuid>)>, sqlx::Error> =
            sqlx::query_as("SELECT user_id, driver_id FROM trips WHERE id = $1")
                .bind(trip_id)
                .fetch_optional(&self.pool)
                .await;

        match parties {
            Err(e) => e.into(),
            Ok(None) => DbError::NotFound("Trip"),
            Ok(Some((customer, driver))) => {
                let visible = match scope {
                    Scope::Customer(id) => customer == id,
                    Scope::Driver(id) => driver == Some(id),
                    Scope::Any => true,
                };
                if visible {
                    DbError::conflict(conflict)
                } else {
                    DbError::NotFound("Trip")
                }
            }
        }
    }
}

async fn insert_account(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
    password_hash: &str,
    full_name: &str,
    phone_number: Option<&str>,
    role: Role,
) -> Result<UserProfile, DbError> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO auth_users (id, email, password_hash) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .execute(&mut **tx)
        .await
        .map_err(|e| DbError::on_unique(e, "An account with this email already exists"))?;

    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO user_profiles (id, full_name, email, phone_number, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(full_name)
    .bind(email)
    .bind(phone_number)
    .bind(role)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| DbError::on_unique(e, "An account with this email already exists"))?;

    Ok(profile)
}
