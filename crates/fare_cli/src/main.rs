//! `fare-compare`: compare ride prices across Addis Ababa providers.

mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use fare_core::booking::Platform;
use fare_core::catalog::{CalibrationEdit, CalibrationField, VehicleCategory};
use fare_core::routing::DEFAULT_ORS_ENDPOINT;
use fare_core::AppConfig;
use h3o::LatLng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "fare-compare",
    version,
    about = "Compare ride-hailing fare estimates across providers in Addis Ababa"
)]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding calibration, favourites and recent searches
    #[arg(long, env = "FARE_COMPARE_DATA_DIR", default_value = ".", global = true)]
    data_dir: PathBuf,

    /// OpenRouteService API key; without it trips are routed in a straight line
    #[arg(long, env = "ORS_API_KEY", hide_env_values = true, global = true)]
    ors_api_key: Option<String>,

    #[arg(long, env = "ORS_ENDPOINT", default_value = DEFAULT_ORS_ENDPOINT, global = true)]
    ors_endpoint: String,

    /// Fail instead of falling back to a straight-line route when routing fails
    #[arg(long, global = true)]
    no_fallback: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate fares for a trip with every enabled provider
    Estimate {
        /// Pickup place name
        pickup: String,
        /// Dropoff place name
        dropoff: String,
        /// Exact pickup coordinates as LAT,LNG
        #[arg(long, value_parser = parse_lat_lng)]
        from_coords: Option<LatLng>,
        /// Exact dropoff coordinates as LAT,LNG
        #[arg(long, value_parser = parse_lat_lng)]
        to_coords: Option<LatLng>,
        /// Local hour of day to price at (defaults to the current hour)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..24), conflicts_with = "rush_hour")]
        hour: Option<u8>,
        /// Preview evening rush-hour prices
        #[arg(long)]
        rush_hour: bool,
        #[arg(long, default_value_t = VehicleCategory::Economy)]
        category: VehicleCategory,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Do not record the trip in recent searches
        #[arg(long)]
        no_history: bool,
    },
    /// Show the effective provider catalog
    Providers {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Adjust provider rates to match observed prices
    Calibrate {
        #[command(subcommand)]
        action: CalibrateAction,
    },
    /// Search known places
    Search { query: String },
    /// List recent searches, newest first
    Recents,
    /// Manage favourite routes
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Print the links used to book with a provider
    Book {
        provider_id: String,
        #[arg(long, default_value_t = Platform::Android)]
        platform: Platform,
        /// The provider's app is installed on the device
        #[arg(long)]
        app_installed: bool,
    },
}

#[derive(Subcommand)]
enum CalibrateAction {
    /// Show the calibrated catalog
    Show,
    /// Set a numeric field (base_fare, per_km, per_min, min_fare, morning_surge, evening_surge, pickup_delay)
    Set {
        provider_id: String,
        field: CalibrationField,
        value: f64,
    },
    /// Set a vehicle category multiplier
    Category {
        provider_id: String,
        category: VehicleCategory,
        value: f64,
    },
    /// Include a provider in comparisons
    Enable { provider_id: String },
    /// Exclude a provider from comparisons
    Disable { provider_id: String },
    /// Drop all calibration and return to the defaults
    Reset,
}

#[derive(Subcommand)]
enum FavoritesAction {
    List,
    Add {
        label: String,
        pickup: String,
        dropoff: String,
        #[arg(long, default_value = "star")]
        icon: String,
    },
    Remove { id: String },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// ── helpers ────────────────────────────────────────────────────────

fn parse_lat_lng(value: &str) -> Result<LatLng, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got '{value}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|error| format!("invalid latitude '{lat}': {error}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|error| format!("invalid longitude '{lng}': {error}"))?;
    LatLng::new(lat, lng).map_err(|error| format!("invalid coordinate: {error}"))
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn app_config(cli: &Cli) -> AppConfig {
    AppConfig::default()
        .with_data_dir(cli.data_dir.clone())
        .with_ors_endpoint(cli.ors_endpoint.clone())
        .with_ors_api_key(cli.ors_api_key.clone())
        .with_straight_line_fallback(!cli.no_fallback)
}

// ── main ───────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = app_config(&cli);

    match cli.command {
        Commands::Estimate {
            pickup,
            dropoff,
            from_coords,
            to_coords,
            hour,
            rush_hour,
            category,
            format,
            no_history,
        } => commands::estimate(
            &config,
            commands::EstimateArgs {
                pickup,
                dropoff,
                from_coords,
                to_coords,
                hour,
                rush_hour,
                category,
                json: format == OutputFormat::Json,
                record_history: !no_history,
            },
        ),
        Commands::Providers { format } => {
            commands::providers(&config, format == OutputFormat::Json)
        }
        Commands::Calibrate { action } => match action {
            CalibrateAction::Show => commands::providers(&config, false),
            CalibrateAction::Set {
                provider_id,
                field,
                value,
            } => commands::calibrate(
                &config,
                CalibrationEdit::Set {
                    provider_id,
                    field,
                    value,
                },
            ),
            CalibrateAction::Category {
                provider_id,
                category,
                value,
            } => commands::calibrate(
                &config,
                CalibrationEdit::SetCategoryMultiplier {
                    provider_id,
                    category,
                    value,
                },
            ),
            CalibrateAction::Enable { provider_id } => commands::calibrate(
                &config,
                CalibrationEdit::SetEnabled {
                    provider_id,
                    enabled: true,
                },
            ),
            CalibrateAction::Disable { provider_id } => commands::calibrate(
                &config,
                CalibrationEdit::SetEnabled {
                    provider_id,
                    enabled: false,
                },
            ),
            CalibrateAction::Reset => commands::reset_calibration(&config),
        },
        Commands::Search { query } => commands::search(&config, &query),
        Commands::Recents => commands::recents(&config),
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::list_favorites(&config),
            FavoritesAction::Add {
                label,
                pickup,
                dropoff,
                icon,
            } => commands::add_favorite(&config, &label, &pickup, &dropoff, &icon),
            FavoritesAction::Remove { id } => commands::remove_favorite(&config, &id),
        },
        Commands::Book {
            provider_id,
            platform,
            app_installed,
        } => commands::book(&provider_id, platform, app_installed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_coordinates() {
        let coordinate = parse_lat_lng("9.0104, 38.7613").expect("valid");
        assert_eq!(coordinate.lat(), 9.0104);
        assert_eq!(coordinate.lng(), 38.7613);
        assert!(parse_lat_lng("9.0104").is_err());
        assert!(parse_lat_lng("north,38.7").is_err());
    }

    #[test]
    fn rush_hour_conflicts_with_explicit_hour() {
        let result = Cli::try_parse_from([
            "fare-compare",
            "estimate",
            "Piassa",
            "Bole",
            "--hour",
            "7",
            "--rush-hour",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn hour_must_be_in_range() {
        let result = Cli::try_parse_from(["fare-compare", "estimate", "A", "B", "--hour", "24"]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let result =
            Cli::try_parse_from(["fare-compare", "estimate", "A", "B", "--category", "limo"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["fare-compare", "estimate", "A", "B", "--category", "VAN"])
            .expect("valid category");
        assert!(matches!(
            cli.command,
            Commands::Estimate {
                category: VehicleCategory::Van,
                ..
            }
        ));
    }
}
