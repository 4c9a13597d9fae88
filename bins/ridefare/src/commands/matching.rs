//! Offline matching commands: normalize, encode, variations, similar, rank

use super::Context;
use crate::output::{format_count, print_json, Status};
use anyhow::{Context as _, Result};
use owo_colors::OwoColorize;
use ridefare_search::{
    are_phonetically_similar, generate_variations, levenshtein_distance, normalize, phonetic_code,
    similarity, Candidate, SuggestionRanker,
};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

#[derive(Serialize)]
struct Transformed<'a> {
    input: &'a str,
    output: String,
}

#[derive(Serialize)]
struct Comparison<'a> {
    a: &'a str,
    b: &'a str,
    distance: usize,
    similarity: f64,
    phonetic_a: String,
    phonetic_b: String,
    similar: bool,
}

#[derive(Serialize)]
struct RankedPlace<'a> {
    place_id: i64,
    name: String,
    display_name: &'a str,
    score: f64,
}

/// Print the normalized spelling of each input
pub fn run_normalize(ctx: &Context, inputs: &[String]) -> Result<()> {
    transform(ctx, inputs, normalize)
}

/// Print the phonetic code of each input
pub fn run_encode(ctx: &Context, inputs: &[String]) -> Result<()> {
    transform(ctx, inputs, phonetic_code)
}

fn transform(ctx: &Context, inputs: &[String], f: fn(&str) -> String) -> Result<()> {
    let rows: Vec<Transformed<'_>> = inputs
        .iter()
        .map(|input| Transformed {
            input,
            output: f(input),
        })
        .collect();

    if ctx.json {
        return print_json(&rows);
    }

    for row in &rows {
        println!("{} {} {}", row.input, "→".dimmed(), row.output.bold());
    }
    Ok(())
}

/// Print the spelling variations tried for a term
pub fn run_variations(ctx: &Context, term: &str) -> Result<()> {
    let variations = generate_variations(term);

    if ctx.json {
        return print_json(&variations);
    }

    Status::header(&format!("Variations of \"{term}\""));
    for variation in &variations {
        println!("  {variation}");
    }
    Status::info(&format_count(variations.len(), "variation", "variations"));
    Ok(())
}

/// Compare two place names
pub fn run_similar(ctx: &Context, a: &str, b: &str) -> Result<()> {
    let report = Comparison {
        a,
        b,
        distance: levenshtein_distance(a, b),
        similarity: similarity(a, b),
        phonetic_a: phonetic_code(a),
        phonetic_b: phonetic_code(b),
        similar: are_phonetically_similar(a, b),
    };

    if ctx.json {
        return print_json(&report);
    }

    Status::header(&format!("{a} vs {b}"));
    println!("  Edit distance: {}", report.distance);
    println!("  Similarity:    {:.3}", report.similarity);
    println!("  Phonetic:      {} / {}", report.phonetic_a, report.phonetic_b);
    if report.similar {
        Status::success("Phonetically similar");
    } else {
        Status::warning("Not phonetically similar");
    }
    Ok(())
}

/// Rank geocoder candidates read from a JSON file (`-` for stdin)
pub fn run_rank(ctx: &Context, query: &str, candidates: &Path) -> Result<()> {
    let raw = if candidates == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read candidates from stdin")?;
        buf
    } else {
        std::fs::read_to_string(candidates)
            .with_context(|| format!("Failed to read {}", candidates.display()))?
    };

    let candidates: Vec<Candidate> =
        serde_json::from_str(&raw).context("Candidates must be a JSON array of geocoder results")?;

    let search = &ctx.config.schema.search;
    let ranker = SuggestionRanker::new(search.min_score, search.max_suggestions);
    let ranked = ranker.rank_scored(query, &candidates);

    tracing::debug!(
        query,
        offered = candidates.len(),
        kept = ranked.len(),
        "Ranked candidates"
    );

    if ctx.json {
        let rows: Vec<RankedPlace<'_>> = ranked
            .iter()
            .map(|scored| RankedPlace {
                place_id: scored.candidate.place_id,
                name: scored.candidate.clean_name(),
                display_name: &scored.candidate.display_name,
                score: scored.score,
            })
            .collect();
        return print_json(&rows);
    }

    if ranked.is_empty() {
        Status::warning(&format!("No candidate scored {} or more", search.min_score));
        return Ok(());
    }

    Status::header(&format!("Suggestions for \"{query}\""));
    for (i, scored) in ranked.iter().enumerate() {
        println!(
            "  {}. {} {}",
            i + 1,
            scored.candidate.display_name,
            format!("({:.1})", scored.score).dimmed()
        );
    }
    Ok(())
}
