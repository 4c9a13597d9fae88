//! Commands that talk to the geocoder: suggest, type-ahead, reverse

use super::Context;
use crate::output::{format_count, format_duration, print_json, Status};
use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use ridefare_geo::Coordinate;
use ridefare_geocoder::{
    spawn_suggestion_feed, GeocoderConfig, LocationMatcher, NominatimClient, SuggestionUpdate,
};
use ridefare_search::Candidate;
use ridefare_telemetry::Timer;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

fn client(ctx: &Context) -> Result<NominatimClient> {
    let config = GeocoderConfig::from_section(&ctx.config.schema.geocoder).with_env_overrides();
    debug!(base_url = %config.base_url, "Using geocoder");
    Ok(NominatimClient::with_config(config).map_err(ridefare_core::Error::from)?)
}

fn matcher(ctx: &Context) -> Result<LocationMatcher<NominatimClient>> {
    Ok(LocationMatcher::from_config(client(ctx)?, &ctx.config.schema.search))
}

fn print_places(query: &str, places: &[Candidate]) {
    if places.is_empty() {
        Status::warning(&format!("No places found for \"{query}\""));
        return;
    }

    Status::header(&format!("Places matching \"{query}\""));
    for (i, place) in places.iter().enumerate() {
        println!(
            "  {}. {} {}",
            i + 1,
            place.display_name,
            format!("({:.4}, {:.4})", place.lat, place.lon).dimmed()
        );
    }
}

/// Look up ranked suggestions for one query
pub async fn run_suggest(ctx: &Context, query: &str) -> Result<()> {
    let matcher = matcher(ctx)?;

    let timer = Timer::start("suggest");
    let places = matcher
        .try_suggest(query)
        .await
        .map_err(ridefare_core::Error::from)?;
    let elapsed = timer.stop();

    if ctx.json {
        return print_json(&places);
    }

    print_places(query, &places);
    Status::info(&format!(
        "{} in {}",
        format_count(places.len(), "suggestion", "suggestions"),
        format_duration(elapsed)
    ));
    Ok(())
}

/// Replay successive states of an input field through the debounced feed
///
/// Each entry of `keystrokes` is the full text of the field at that moment,
/// pushed `gap` apart. Every update the feed accepts is printed.
pub async fn run_type_ahead(ctx: &Context, keystrokes: &[String], gap: Duration) -> Result<()> {
    let Some(last) = keystrokes.last() else {
        bail!("Give at least one keystroke");
    };

    let search = &ctx.config.schema.search;
    let debounce = Duration::from_millis(search.debounce_ms);
    let matcher = Arc::new(matcher(ctx)?);
    let feed = spawn_suggestion_feed(Arc::clone(&matcher), debounce);
    let mut updates = feed.subscribe();

    for text in keystrokes {
        debug!(text = %text, "Keystroke");
        feed.push(text.as_str());
        tokio::time::sleep(gap).await;
    }

    // Debounce, at most two provider round trips and the pause between them
    let deadline = debounce
        + Duration::from_millis(search.retry_pause_ms)
        + matcher.geocoder().config().timeout * 2;

    let mut seen: Vec<SuggestionUpdate> = Vec::new();
    let settled = tokio::time::timeout(deadline, async {
        loop {
            let latest = updates.borrow_and_update().clone();
            if latest.generation > 0 && seen.last().map(|u| u.generation) != Some(latest.generation) {
                seen.push(latest.clone());
            }
            if latest.generation > 0 && latest.query == *last {
                return true;
            }
            if updates.changed().await.is_err() {
                return false;
            }
        }
    })
    .await
    .unwrap_or(false);

    let searches = feed.session().generation();
    feed.close().await;

    if !settled {
        Status::warning(&format!("No answer for \"{last}\" within {}", format_duration(deadline)));
    }

    if ctx.json {
        return print_json(&seen);
    }

    for update in &seen {
        print_places(&update.query, &update.suggestions);
    }
    Status::info(&format!(
        "{} typed, {} sent",
        format_count(keystrokes.len(), "keystroke", "keystrokes"),
        format_count(usize::try_from(searches).unwrap_or(usize::MAX), "search", "searches")
    ));
    Ok(())
}

/// Name the place at a coordinate
pub async fn run_reverse(ctx: &Context, at: Coordinate) -> Result<()> {
    if !at.is_valid() {
        return Err(ridefare_core::Error::validation(format!(
            "Coordinate out of range: {}, {}",
            at.latitude, at.longitude
        ))
        .into());
    }

    let place = client(ctx)?
        .reverse(at)
        .await
        .map_err(ridefare_core::Error::from)?;

    if ctx.json {
        return print_json(&place);
    }

    Status::success(&place.display_name);
    println!("  Name: {}", place.clean_name().bold());
    Ok(())
}
