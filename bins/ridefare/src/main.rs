//! ridefare - place lookup and stopover fare allocation
//!
//! Offline commands exercise the matching and pricing engines directly;
//! `suggest`, `type-ahead` and `reverse` talk to the configured geocoder.

use clap::{Parser, Subcommand};
use ridefare_core::config::Config;
use ridefare_core::error::exit_codes;
use ridefare_geo::Coordinate;
use ridefare_telemetry::TelemetryConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

mod commands;
mod output;

use commands::price::{parse_coordinate, parse_stop, PriceArgs, StopArg};
use commands::{geocode, matching, price, Context};
use output::Status;

/// Place lookup and stopover fare allocation
#[derive(Parser)]
#[command(name = "ridefare")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to ridefare.toml, then the user config directory)
    #[arg(short, long, global = true, env = "RIDEFARE_CONFIG")]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fold spelling variants of place names to one form
    Normalize {
        /// Names to normalize
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show the phonetic code of place names
    Encode {
        /// Names to encode
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// List the alternative spellings tried for a term
    Variations {
        /// Place name
        term: String,
    },

    /// Compare two place names
    Similar {
        /// First name
        a: String,
        /// Second name
        b: String,
    },

    /// Rank saved geocoder results against a query
    Rank {
        /// What the user typed
        query: String,

        /// JSON array of geocoder results, `-` for stdin
        #[arg(short = 'f', long, default_value = "-")]
        candidates: PathBuf,
    },

    /// Ask the geocoder for ranked place suggestions
    Suggest {
        /// What the user typed
        query: String,
    },

    /// Replay keystrokes through the debounced suggestion feed
    TypeAhead {
        /// Successive contents of the input field
        #[arg(required = true)]
        keystrokes: Vec<String>,

        /// Milliseconds between keystrokes
        #[arg(long, default_value = "150")]
        gap_ms: u64,
    },

    /// Name the place at a coordinate
    Reverse {
        /// Latitude in degrees
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(allow_hyphen_values = true)]
        lon: f64,
    },

    /// Split a trip price across its stopovers
    Price {
        /// Saved trip (JSON) to start from
        #[arg(long)]
        trip: Option<PathBuf>,

        /// Trip start as LAT,LON
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        from: Option<Coordinate>,

        /// Trip end as LAT,LON
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        to: Option<Coordinate>,

        /// Stopover as NAME@LAT,LON, repeatable, in route order
        #[arg(short, long = "stop", value_parser = parse_stop)]
        stops: Vec<StopArg>,

        /// Full-route price
        #[arg(short, long)]
        total: Option<f64>,

        /// Road distance of the full route in kilometres
        #[arg(short, long)]
        route_km: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            Status::error(&e.to_string());
            return ExitCode::from(exit_code_u8(exit_codes::CONFIG_ERROR));
        }
    };

    let telemetry = TelemetryConfig::from_section(&config.schema.telemetry).with_verbosity(cli.verbose);
    if let Err(e) = ridefare_telemetry::init_with_config(&telemetry) {
        Status::warning(&format!("Logging disabled: {e}"));
    }

    tracing::debug!(config = ?config.path, "Configuration loaded");

    let ctx = Context {
        config,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Normalize { names } => matching::run_normalize(&ctx, &names),
        Commands::Encode { names } => matching::run_encode(&ctx, &names),
        Commands::Variations { term } => matching::run_variations(&ctx, &term),
        Commands::Similar { a, b } => matching::run_similar(&ctx, &a, &b),
        Commands::Rank { query, candidates } => matching::run_rank(&ctx, &query, &candidates),

        Commands::Suggest { query } => geocode::run_suggest(&ctx, &query).await,
        Commands::TypeAhead { keystrokes, gap_ms } => {
            geocode::run_type_ahead(&ctx, &keystrokes, Duration::from_millis(gap_ms)).await
        }
        Commands::Reverse { lat, lon } => geocode::run_reverse(&ctx, Coordinate::new(lat, lon)).await,

        Commands::Price { trip, from, to, stops, total, route_km } => price::run(
            &ctx,
            &PriceArgs {
                trip,
                from,
                to,
                stops,
                total,
                route_km,
            },
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Status::error(&format!("{e:#}"));
            ExitCode::from(exit_code_u8(commands::exit_code(&e)))
        }
    }
}

fn exit_code_u8(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}
