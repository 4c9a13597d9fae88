//! Fare allocation command

use super::{geo_error, Context};
use crate::output::{format_count, format_km, print_json, Status};
use anyhow::{Context as _, Result};
use owo_colors::OwoColorize;
use ridefare_geo::{Coordinate, SegmentPriceAllocator, TripDraft};
use std::path::PathBuf;

/// A stopover given on the command line as `NAME@LAT,LON`
#[derive(Debug, Clone, PartialEq)]
pub struct StopArg {
    /// Display name
    pub name: String,
    /// Location
    pub at: Coordinate,
}

impl StopArg {
    /// Identifier derived from the name: lowercase, spaces to dashes
    pub fn id(&self) -> String {
        self.name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Parse `LAT,LON`
pub fn parse_coordinate(text: &str) -> Result<Coordinate, String> {
    let (lat, lon) = text
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got \"{text}\""))?;

    let lat: f64 = lat.trim().parse().map_err(|_| format!("bad latitude \"{lat}\""))?;
    let lon: f64 = lon.trim().parse().map_err(|_| format!("bad longitude \"{lon}\""))?;

    let at = Coordinate::new(lat, lon);
    if !at.is_valid() {
        return Err(format!("{lat}, {lon} is outside the valid range"));
    }
    Ok(at)
}

/// Parse `NAME@LAT,LON`
pub fn parse_stop(text: &str) -> Result<StopArg, String> {
    let (name, at) = text
        .rsplit_once('@')
        .ok_or_else(|| format!("expected NAME@LAT,LON, got \"{text}\""))?;

    let name = name.trim();
    if name.is_empty() {
        return Err("stopover name cannot be empty".to_string());
    }

    Ok(StopArg {
        name: name.to_string(),
        at: parse_coordinate(at)?,
    })
}

/// Inputs of the `price` command
#[derive(Debug, Default)]
pub struct PriceArgs {
    /// Saved trip to start from
    pub trip: Option<PathBuf>,
    /// Trip start, required without `trip`
    pub from: Option<Coordinate>,
    /// Trip end, required without `trip`
    pub to: Option<Coordinate>,
    /// Stopovers appended in the order given
    pub stops: Vec<StopArg>,
    /// Full-route price
    pub total: Option<f64>,
    /// Road distance of the full route
    pub route_km: Option<f64>,
}

/// Assemble the trip described by the arguments
pub fn build_trip(args: &PriceArgs, min_fare: i64) -> Result<TripDraft> {
    let mut trip = match &args.trip {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<TripDraft>(&raw)
                .map_err(|e| ridefare_core::Error::validation(format!("Invalid trip file: {e}")))?
        }
        None => match (args.from, args.to) {
            (Some(from), Some(to)) => TripDraft::new(from, to),
            _ => {
                return Err(ridefare_core::Error::validation("Both --from and --to are required")
                    .with_suggestion("Pass --trip FILE or both endpoints as LAT,LON")
                    .into());
            }
        },
    }
    .with_allocator(SegmentPriceAllocator::with_min_fare(min_fare));

    if let Some(from) = args.from {
        trip.set_origin(from);
    }
    if let Some(to) = args.to {
        trip.set_destination(to);
    }
    if let Some(total) = args.total {
        trip.set_total_price(total);
    }
    if let Some(route_km) = args.route_km {
        trip.set_route_distance_km(route_km);
    }

    for stop in &args.stops {
        trip.stopovers_mut()
            .add(stop.id(), stop.name.as_str(), stop.at)
            .map_err(geo_error)?;
    }

    Ok(trip)
}

/// Split the trip price across its stopovers
pub fn run(ctx: &Context, args: &PriceArgs) -> Result<()> {
    let trip = build_trip(args, ctx.config.schema.pricing.min_fare)?;

    let Some(allocation) = trip.allocation().map_err(geo_error)? else {
        return Err(ridefare_core::Error::invalid_pricing(
            "Total price and route distance are both required",
        )
        .into());
    };

    if ctx.json {
        return print_json(&allocation);
    }

    Status::header("Fare split");
    println!("  Total:  {:.0}", allocation.total_price);
    println!("  Route:  {}", format_km(allocation.route_distance_km));
    println!("  Rate:   {:.2} per km", allocation.per_km_rate);

    if allocation.segments.is_empty() {
        Status::info("No stopovers; the full price applies");
        return Ok(());
    }

    println!();
    for (stop, segment) in trip.stopovers().iter().zip(&allocation.segments) {
        println!(
            "  {}. {:<20} {:>10}  {}",
            stop.order,
            stop.name,
            format_km(segment.distance_to_destination_km),
            segment.price.to_string().bold()
        );
    }
    Status::success(&format_count(allocation.segments.len(), "stopover priced", "stopovers priced"));
    Ok(())
}
