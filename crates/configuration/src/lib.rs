use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{
    AuthSettings, DatabaseSettings, LoggingSettings, PricingSettings, ServerSettings, Settings,
};

const ENV_PREFIX: &str = "RIDEBOOK";
const MIN_SECRET_LEN: usize = 32;

/// Loads the application configuration from the `config.toml` file.
///
/// The file is optional; every key can also come from the environment as
/// `RIDEBOOK_<SECTION>__<KEY>` (e.g. `RIDEBOOK_AUTH__SESSION_SECRET`). A plain
/// `DATABASE_URL`, read after loading `.env`, overrides `database.url`.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config.toml"))
}

pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();

    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    validate(&settings)?;
    Ok(settings)
}

/// Parses settings from a TOML document without consulting the environment.
pub fn settings_from_toml(toml: &str) -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Settings>()?;
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.auth.session_secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::ValidationError(format!(
            "auth.session_secret must be at least {MIN_SECRET_LEN} bytes"
        )));
    }
    if settings.auth.session_ttl_hours <= 0 {
        return Err(ConfigError::ValidationError(
            "auth.session_ttl_hours must be positive".to_string(),
        ));
    }
    if settings.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port must not be 0".to_string(),
        ));
    }
    if settings.database.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "database.max_connections must be at least 1".to_string(),
        ));
    }
    let pricing = &settings.pricing;
    if pricing.airport_flat_fare.is_sign_negative() || pricing.city_tour_hourly_rate.is_sign_negative() {
        return Err(ConfigError::ValidationError(
            "pricing fares must not be negative".to_string(),
        ));
    }
    Ok(())
}
