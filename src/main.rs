use analytics::{AnalyticsEngine, DriverOverview};
use chrono::Utc;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{init_logging, load_settings_from, Settings};
use core_types::{normalize_email, NewDriver};
use database::{connect, run_migrations, DbRepository};
use std::path::PathBuf;

/// The main entry point for the Ridebook application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings_from(&cli.config)?;
    // Flushes the log file on exit.
    let _log_guard = init_logging(&settings.logging)?;

    let result = match cli.command {
        Commands::Serve(args) => {
            if let Some(host) = args.host {
                settings.server.host = host;
            }
            if let Some(port) = args.port {
                settings.server.port = port;
            }
            web_server::run_server(&settings).await
        }
        Commands::Migrate => handle_migrate(&settings).await,
        Commands::PromoteAdmin { email } => handle_promote_admin(&settings, &email).await,
        Commands::CreateDriver(args) => handle_create_driver(&settings, args).await,
        Commands::ListDrivers { json } => handle_list_drivers(&settings, json).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = ?e, "Command failed");
    }
    result
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Ride booking for customers, drivers and admins.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Missing files are ignored.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Apply database migrations and exit.
    Migrate,
    /// Grant admin rights to an existing account.
    PromoteAdmin {
        #[arg(long)]
        email: String,
    },
    /// Provision a driver account with its vehicle.
    CreateDriver(CreateDriverArgs),
    /// Print every driver with rating and trip count.
    ListDrivers {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.host`.
    #[arg(long)]
    host: Option<String>,
    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct CreateDriverArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    phone_number: Option<String>,
    #[arg(long)]
    license_number: String,
    #[arg(long)]
    vehicle_make: String,
    #[arg(long)]
    vehicle_model: String,
    #[arg(long)]
    vehicle_year: i32,
    #[arg(long)]
    vehicle_color: String,
    #[arg(long)]
    vehicle_plate: String,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Connects and brings the schema up to date.
async fn open_repository(settings: &Settings) -> anyhow::Result<DbRepository> {
    let db_pool = connect(&settings.database).await?;
    run_migrations(&db_pool).await?;
    Ok(DbRepository::new(db_pool))
}

async fn handle_migrate(settings: &Settings) -> anyhow::Result<()> {
    open_repository(settings).await?;
    println!("Migrations applied.");
    Ok(())
}

async fn handle_promote_admin(settings: &Settings, email: &str) -> anyhow::Result<()> {
    let db_repo = open_repository(settings).await?;
    let profile = db_repo.promote_to_admin(&normalize_email(email)).await?;
    println!("{} ({}) is now an admin.", profile.full_name, profile.email);
    Ok(())
}

async fn handle_create_driver(settings: &Settings, args: CreateDriverArgs) -> anyhow::Result<()> {
    let driver = NewDriver {
        email: args.email,
        password: args.password,
        full_name: args.full_name,
        phone_number: args.phone_number,
        license_number: args.license_number,
        vehicle_make: args.vehicle_make,
        vehicle_model: args.vehicle_model,
        vehicle_year: args.vehicle_year,
        vehicle_color: args.vehicle_color,
        vehicle_plate: args.vehicle_plate,
    }
    .validated(Utc::now())?;

    let password_hash = auth::hash_password(&driver.password)?;
    let db_repo = open_repository(settings).await?;
    let (profile, driver_profile) = db_repo.create_driver(&driver, &password_hash).await?;

    println!(
        "Created driver {} <{}> with id {} ({} {}, plate {}).",
        profile.full_name,
        profile.email,
        profile.id,
        driver_profile.vehicle_make,
        driver_profile.vehicle_model,
        driver_profile.vehicle_plate
    );
    Ok(())
}

async fn handle_list_drivers(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let db_repo = open_repository(settings).await?;
    let records = db_repo.list_drivers().await?;
    let drivers = AnalyticsEngine::new().driver_overview(&records);

    if json {
        println!("{}", serde_json::to_string_pretty(&drivers)?);
    } else {
        println!("{}", drivers_table(&drivers));
    }
    Ok(())
}

fn drivers_table(drivers: &[DriverOverview]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Name", "Email", "Vehicle", "Plate", "Active", "Tags", "Rating", "Trips",
    ]);

    for driver in drivers {
        let vehicle = driver.driver_profile.vehicle();
        table.add_row(vec![
            driver.full_name.clone(),
            driver.email.clone(),
            format!("{} {} {} ({})", vehicle.year, vehicle.make, vehicle.model, vehicle.color),
            vehicle.plate,
            if driver.driver_profile.is_active { "yes" } else { "no" }.to_string(),
            driver.tags.join(", "),
            driver.rating.to_string(),
            driver.total_trips.to_string(),
        ]);
    }
    table
}
