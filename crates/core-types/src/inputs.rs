//! Client-supplied inputs and the rules they must satisfy before they reach
//! the database. Each `validated` method consumes the input and returns a
//! normalized copy (trimmed strings, lower-cased emails, blank optionals
//! turned into `None`).

use crate::enums::{TripStatus, TripType};
use crate::error::CoreError;
use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;

const MIN_PASSWORD_LEN: usize = 6;
const MIN_NAME_LEN: usize = 2;
const MAX_TAG_LEN: usize = 32;
const MAX_TOUR_HOURS: i32 = 12;
const OLDEST_VEHICLE_YEAR: i32 = 1980;

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Tags are a small admin-managed label set, compared case-insensitively.
pub fn normalize_tag(tag: &str) -> Result<String, CoreError> {
    let tag = tag.trim().to_lowercase();
    if tag.is_empty() {
        return Err(CoreError::validation("tag", "Tag cannot be empty"));
    }
    if tag.chars().count() > MAX_TAG_LEN {
        return Err(CoreError::validation(
            "tag",
            format!("Tag must be at most {MAX_TAG_LEN} characters"),
        ));
    }
    Ok(tag)
}

/// A star rating left by a customer on a completed trip.
pub fn check_rating(rating: i16) -> Result<i16, CoreError> {
    if !(1..=5).contains(&rating) {
        return Err(CoreError::validation("rating", "Rating must be between 1 and 5"));
    }
    Ok(rating)
}

pub fn check_cancellation_reason(reason: &str) -> Result<String, CoreError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(CoreError::validation(
            "reason",
            "Please provide a reason for cancellation",
        ));
    }
    Ok(reason.to_string())
}

fn check_email(email: &str) -> Result<(), CoreError> {
    let invalid = || CoreError::validation("email", "Please enter a valid email");
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }
    Ok(())
}

fn check_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::validation(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

fn check_name(name: &str) -> Result<(), CoreError> {
    if name.chars().count() < MIN_NAME_LEN {
        return Err(CoreError::validation(
            "full_name",
            format!("Name must be at least {MIN_NAME_LEN} characters"),
        ));
    }
    Ok(())
}

fn required(field: &'static str, value: &str) -> Result<String, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::validation(field, format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn check_vehicle_year(year: i32, now: DateTime<Utc>) -> Result<(), CoreError> {
    let newest = now.year() + 1;
    if !(OLDEST_VEHICLE_YEAR..=newest).contains(&year) {
        return Err(CoreError::validation(
            "vehicle_year",
            format!("Vehicle year must be between {OLDEST_VEHICLE_YEAR} and {newest}"),
        ));
    }
    Ok(())
}

/// Trims an optional string and drops it when nothing is left.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A booking request from a customer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewTrip {
    pub trip_type: TripType,
    pub pickup_time: DateTime<Utc>,
    pub pickup_location: String,
    pub dropoff_location: Option<String>,
    pub flight_number: Option<String>,
    pub hours: Option<i32>,
}

impl NewTrip {
    pub fn validated(self, now: DateTime<Utc>) -> Result<Self, CoreError> {
        let pickup_location = required("pickup_location", &self.pickup_location)?;

        if self.pickup_time <= now {
            return Err(CoreError::validation(
                "pickup_time",
                "Pickup time must be in the future",
            ));
        }

        let dropoff_location = non_blank(self.dropoff_location);
        if self.trip_type.is_airport() && dropoff_location.is_none() {
            return Err(CoreError::validation(
                "dropoff_location",
                "Airport transfers need a dropoff location",
            ));
        }

        let hours = match (self.trip_type, self.hours) {
            (TripType::CityTour, Some(h)) if (1..=MAX_TOUR_HOURS).contains(&h) => Some(h),
            (TripType::CityTour, _) => {
                return Err(CoreError::validation(
                    "hours",
                    format!("City tours last between 1 and {MAX_TOUR_HOURS} hours"),
                ));
            }
            (_, Some(_)) => {
                return Err(CoreError::validation(
                    "hours",
                    "Hours only apply to city tours",
                ));
            }
            (_, None) => None,
        };

        let flight_number = match non_blank(self.flight_number) {
            Some(flight) => {
                let flight = flight.to_uppercase();
                let valid = (2..=10).contains(&flight.len())
                    && flight.chars().all(|c| c.is_ascii_alphanumeric());
                if !valid {
                    return Err(CoreError::validation(
                        "flight_number",
                        "Flight number must be 2 to 10 letters or digits",
                    ));
                }
                Some(flight)
            }
            None => None,
        };

        Ok(Self {
            trip_type: self.trip_type,
            pickup_time: self.pickup_time,
            pickup_location,
            dropoff_location,
            flight_number,
            hours,
        })
    }
}

/// Self-service account creation. Always produces a customer account.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupInput {
    pub fn validated(self) -> Result<Self, CoreError> {
        let name = self.name.trim().to_string();
        check_name(&name)?;
        let email = normalize_email(&self.email);
        check_email(&email)?;
        check_password(&self.password)?;
        if self.password != self.confirm_password {
            return Err(CoreError::validation(
                "confirm_password",
                "Passwords don't match",
            ));
        }
        Ok(Self {
            name,
            email,
            password: self.password,
            confirm_password: self.confirm_password,
        })
    }
}

/// Admin-provisioned driver account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDriver {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub license_number: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_year: i32,
    pub vehicle_color: String,
    pub vehicle_plate: String,
}

impl NewDriver {
    pub fn validated(self, now: DateTime<Utc>) -> Result<Self, CoreError> {
        let email = normalize_email(&self.email);
        check_email(&email)?;
        check_password(&self.password)?;
        let full_name = self.full_name.trim().to_string();
        check_name(&full_name)?;
        check_vehicle_year(self.vehicle_year, now)?;

        Ok(Self {
            email,
            password: self.password,
            full_name,
            phone_number: non_blank(self.phone_number),
            license_number: required("license_number", &self.license_number)?,
            vehicle_make: required("vehicle_make", &self.vehicle_make)?,
            vehicle_model: required("vehicle_model", &self.vehicle_model)?,
            vehicle_year: self.vehicle_year,
            vehicle_color: required("vehicle_color", &self.vehicle_color)?,
            vehicle_plate: required("vehicle_plate", &self.vehicle_plate)?.to_uppercase(),
        })
    }
}

/// A partial update of a driver. Absent or blank fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DriverUpdate {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub license_number: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_year: Option<i32>,
    pub vehicle_color: Option<String>,
    pub vehicle_plate: Option<String>,
    pub is_active: Option<bool>,
}

impl DriverUpdate {
    pub fn validated(self, now: DateTime<Utc>) -> Result<Self, CoreError> {
        let full_name = non_blank(self.full_name);
        if let Some(name) = &full_name {
            check_name(name)?;
        }
        if let Some(year) = self.vehicle_year {
            check_vehicle_year(year, now)?;
        }

        Ok(Self {
            full_name,
            phone_number: non_blank(self.phone_number),
            license_number: non_blank(self.license_number),
            vehicle_make: non_blank(self.vehicle_make),
            vehicle_model: non_blank(self.vehicle_model),
            vehicle_year: self.vehicle_year,
            vehicle_color: non_blank(self.vehicle_color),
            vehicle_plate: non_blank(self.vehicle_plate).map(|p| p.to_uppercase()),
            is_active: self.is_active,
        })
    }

    pub fn touches_user_profile(&self) -> bool {
        self.full_name.is_some() || self.phone_number.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Filters for the admin trip listing. `from`/`to` bound the pickup time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripFilter {
    pub status: Option<TripStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TripFilter {
    pub fn validated(self) -> Result<Self, CoreError> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(CoreError::validation("from", "Start date is after end date"));
            }
        }
        Ok(self)
    }
}
