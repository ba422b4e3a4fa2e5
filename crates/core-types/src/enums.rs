use crate::error::CoreError;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The role an account is registered under, and the role a session claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase", try_from = "String")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Customer,
    Driver,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Driver => "driver",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    /// Accepts the login form's "Administrator" label as an alias for `admin`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "driver" => Ok(Role::Driver),
            "admin" | "administrator" => Ok(Role::Admin),
            _ => Err(CoreError::UnknownValue {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "trip_type", rename_all = "snake_case")]
pub enum TripType {
    AirportPickup,
    AirportDropoff,
    CityTour,
}

impl TripType {
    pub fn is_airport(&self) -> bool {
        matches!(self, TripType::AirportPickup | TripType::AirportDropoff)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::AirportPickup => "airport_pickup",
            TripType::AirportDropoff => "airport_dropoff",
            TripType::CityTour => "city_tour",
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a trip.
///
/// ```text
/// scheduled -> en-route -> completed
/// scheduled -> cancelled
/// ```
///
/// Removing the driver from a trip puts it back to `scheduled`; that reset is
/// an administrative write and does not go through `can_transition_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "trip_status")]
pub enum TripStatus {
    #[serde(rename = "scheduled")]
    #[sqlx(rename = "scheduled")]
    Scheduled,
    #[serde(rename = "en-route")]
    #[sqlx(rename = "en-route")]
    EnRoute,
    #[serde(rename = "completed")]
    #[sqlx(rename = "completed")]
    Completed,
    #[serde(rename = "cancelled")]
    #[sqlx(rename = "cancelled")]
    Cancelled,
}

impl TripStatus {
    pub const ALL: [TripStatus; 4] = [
        TripStatus::Scheduled,
        TripStatus::EnRoute,
        TripStatus::Completed,
        TripStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Scheduled => "scheduled",
            TripStatus::EnRoute => "en-route",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }

    /// Scheduled or en-route: the trip still needs a driver's attention.
    pub fn is_active(&self) -> bool {
        matches!(self, TripStatus::Scheduled | TripStatus::EnRoute)
    }

    pub fn is_finished(&self) -> bool {
        !self.is_active()
    }

    pub fn can_transition_to(&self, next: TripStatus) -> bool {
        matches!(
            (self, next),
            (TripStatus::Scheduled, TripStatus::EnRoute)
                | (TripStatus::EnRoute, TripStatus::Completed)
                | (TripStatus::Scheduled, TripStatus::Cancelled)
        )
    }

    /// Returns `next` if the move is allowed, otherwise an `InvalidTransition` error.
    pub fn transition_to(&self, next: TripStatus) -> Result<TripStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition { from: *self, to: next })
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TripStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::UnknownValue {
                kind: "trip status",
                value: s.to_string(),
            })
    }
}

/// The look-back window used by the admin dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Day,
    #[default]
    Week,
    Month,
    Year,
}

impl Timeframe {
    /// The inclusive lower bound of the window ending at `now`.
    pub fn start_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Timeframe::Day => now - Duration::days(1),
            Timeframe::Week => now - Duration::days(7),
            Timeframe::Month => now
                .checked_sub_months(Months::new(1))
                .unwrap_or(now - Duration::days(30)),
            Timeframe::Year => now
                .checked_sub_months(Months::new(12))
                .unwrap_or(now - Duration::days(365)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn role_parses_administrator_alias() {
        assert_eq!("Administrator".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" driver ".parse::<Role>().unwrap(), Role::Driver);
        assert!("passenger".parse::<Role>().is_err());

        for raw in ["\"Administrator\"", "\"ADMINISTRATOR\"", "\"Admin\""] {
            let role: Role = serde_json::from_str(raw).unwrap();
            assert_eq!(role, Role::Admin);
        }
        assert!(serde_json::from_str::<Role>("\"passenger\"").is_err());
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn trip_status_uses_hyphenated_wire_name() {
        assert_eq!(serde_json::to_string(&TripStatus::EnRoute).unwrap(), "\"en-route\"");
        assert_eq!("en-route".parse::<TripStatus>().unwrap(), TripStatus::EnRoute);
        assert!("en_route".parse::<TripStatus>().is_err());
    }

    #[test]
    fn only_forward_transitions_are_allowed() {
        use TripStatus::*;
        let allowed = [(Scheduled, EnRoute), (EnRoute, Completed), (Scheduled, Cancelled)];

        for from in TripStatus::ALL {
            for to in TripStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }

        assert_eq!(
            Completed.transition_to(Scheduled),
            Err(CoreError::InvalidTransition { from: Completed, to: Scheduled })
        );
        assert!(EnRoute.transition_to(Cancelled).is_err());
    }

    #[test]
    fn timeframe_uses_calendar_months() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        assert_eq!(Timeframe::Day.start_from(now), Utc.with_ymd_and_hms(2024, 3, 30, 12, 0, 0).unwrap());
        assert_eq!(Timeframe::Week.start_from(now), Utc.with_ymd_and_hms(2024, 3, 24, 12, 0, 0).unwrap());
        // February has no 31st, chrono clamps to the last day of the month.
        assert_eq!(Timeframe::Month.start_from(now), Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
        assert_eq!(Timeframe::Year.start_from(now), Utc.with_ymd_and_hms(2023, 3, 31, 12, 0, 0).unwrap());
    }
}
