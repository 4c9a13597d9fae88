//! Alternate spellings of a query for retry and expansion.

use crate::normalize;
use crate::normalize::is_vowel;
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of spellings returned by [`generate_variations`].
pub const MAX_VARIATIONS: usize = 4;

/// Alternates shorter than this are too ambiguous to search for.
const MIN_ALTERNATE_CHARS: usize = 3;

/// South Indian spellings often write `e` where northern ones write `a` before a consonant.
static A_BEFORE_CONSONANT: Lazy<Regex> =
    Lazy::new(|| Regex::new("a([b-df-hj-np-tv-z])").expect("static pattern is valid"));

/// Generate up to [`MAX_VARIATIONS`] spellings of `term`, most useful first.
///
/// The lowercased original and its normalized form always come first. For
/// multi-word input the first word follows ("Guntur District" → "guntur").
/// Then the transliteration swaps `t↔th`, `d↔dh`, `i↔y`, `a→e` before a
/// consonant, `pur↔puram`, and dropping a trailing vowel. Alternates shorter
/// than three characters or equal to the original are skipped; duplicates keep
/// their first position.
///
/// # Example
/// ```
/// use ridefare_search::generate_variations;
///
/// let spellings = generate_variations("Nagpur");
/// assert_eq!(spellings, ["nagpur", "nag", "negpur", "nagpuram"]);
/// ```
pub fn generate_variations(term: &str) -> Vec<String> {
    let original = term.trim().to_lowercase();
    let mut out: Vec<String> = Vec::with_capacity(MAX_VARIATIONS);

    let push = |candidate: String, out: &mut Vec<String>| {
        if out.len() < MAX_VARIATIONS && !candidate.is_empty() && !out.contains(&candidate) {
            out.push(candidate);
        }
    };

    push(original.clone(), &mut out);
    push(normalize(&original), &mut out);

    let alternates = first_word(&original)
        .into_iter()
        .chain([
            swap_pair(&original, "t", "th"),
            swap_pair(&original, "d", "dh"),
            swap_pair(&original, "i", "y"),
            A_BEFORE_CONSONANT.replace_all(&original, "e$1").into_owned(),
            swap_pur_suffix(&original),
            drop_trailing_vowel(&original),
        ])
        .filter(|alt| alt.chars().count() >= MIN_ALTERNATE_CHARS && *alt != original);

    for alternate in alternates {
        push(alternate, &mut out);
    }

    out
}

/// First word of a multi-word term, when it is long enough to stand alone.
fn first_word(term: &str) -> Option<String> {
    let mut words = term.split_whitespace();
    let first = words.next()?;
    words.next()?;
    (first.chars().count() >= MIN_ALTERNATE_CHARS).then(|| first.to_string())
}

/// Replace `long` with `short` when present, otherwise `short` with `long`.
fn swap_pair(term: &str, short: &str, long: &str) -> String {
    if term.contains(long) {
        term.replace(long, short)
    } else {
        term.replace(short, long)
    }
}

fn swap_pur_suffix(term: &str) -> String {
    if let Some(stem) = term.strip_suffix("puram") {
        format!("{stem}pur")
    } else if term.ends_with("pur") {
        format!("{term}am")
    } else {
        term.to_string()
    }
}

fn drop_trailing_vowel(term: &str) -> String {
    let mut s = term.to_string();
    if s.chars().last().is_some_and(is_vowel) {
        s.pop();
    }
    s
}
