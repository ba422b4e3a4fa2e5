use core_types::FareTable;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::net::SocketAddr;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub pricing: PricingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the HTTP API listens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origin allowed by CORS. Any origin is allowed when unset.
    #[serde(default)]
    pub cors_allow_origin: Option<String>,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allow_origin: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// A `postgres://` connection string. `DATABASE_URL` takes precedence.
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// HMAC key for session tokens. At least 32 bytes.
    pub session_secret: String,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
}

/// Fares applied when a trip is booked.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingSettings {
    #[serde(default = "default_airport_flat_fare")]
    pub airport_flat_fare: Decimal,
    #[serde(default = "default_city_tour_hourly_rate")]
    pub city_tour_hourly_rate: Decimal,
}

impl PricingSettings {
    pub fn fare_table(&self) -> FareTable {
        FareTable {
            airport_flat_fare: self.airport_flat_fare,
            city_tour_hourly_rate: self.city_tour_hourly_rate,
        }
    }
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            airport_flat_fare: default_airport_flat_fare(),
            city_tour_hourly_rate: default_city_tour_hourly_rate(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Directory for the daily rolling log file.
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_file_prefix")]
    pub file_prefix: String,
    /// Fallback `EnvFilter` directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            file_prefix: default_log_file_prefix(),
            filter: default_log_filter(),
        }
    }
}

// --- Default Implementations ---

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_max_connections() -> u32 {
    10
}
fn default_acquire_timeout_secs() -> u64 {
    5
}
fn default_session_ttl_hours() -> i64 {
    24 * 30
}
fn default_airport_flat_fare() -> Decimal {
    dec!(85.00)
}
fn default_city_tour_hourly_rate() -> Decimal {
    dec!(65.00)
}
fn default_log_directory() -> String {
    "logs".to_string()
}
fn default_log_file_prefix() -> String {
    "ridebook.log".to_string()
}
fn default_log_filter() -> String {
    "info".to_string()
}
