//! Canonical form of a place name for comparison.
//!
//! The form is lossy on purpose: "Tirupathi", "Tirupati" and "Thirupathy" all
//! land on `tirupat`. It is only ever compared against other normalized forms,
//! never shown to users.

/// Locale suffixes, longest first so that `abad` wins over `bad`.
const LOCALE_SUFFIXES: [&str; 7] = ["puram", "nagar", "pally", "palli", "abad", "pur", "bad"];

/// Character-class folds, applied in this exact order. Later rules see the
/// output of earlier ones (`y→i` must run before `ee→i` can catch `yee`).
const FOLD_RULES: [(&str, &str); 14] = [
    ("y", "i"),
    ("ee", "i"),
    ("oo", "u"),
    ("aa", "a"),
    ("th", "t"),
    ("dh", "d"),
    ("bh", "b"),
    ("gh", "g"),
    ("kh", "k"),
    ("ph", "f"),
    ("sh", "s"),
    ("ch", "c"),
    ("w", "v"),
    ("z", "s"),
];

pub(crate) fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Normalize a place name for comparison.
///
/// Lowercases and trims, strips one locale suffix (`puram`, `pur`, `bad`,
/// `abad`, `nagar`, `pally`, `palli`), applies the ordered character folds,
/// collapses runs of identical characters and drops one trailing vowel.
///
/// A single pass can expose more work for the next one (`goa` → `go`), so the
/// pass is repeated until the text stops changing. That keeps
/// `normalize(normalize(x)) == normalize(x)` for every input.
///
/// # Example
/// ```
/// use ridefare_search::normalize;
///
/// assert_eq!(normalize("  Tirupathi "), "tirupat");
/// assert_eq!(normalize("Hyderabad"), "hider");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    let mut current = text.to_lowercase();
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn normalize_pass(text: &str) -> String {
    let mut s = strip_locale_suffix(text.trim()).to_string();

    for (pattern, replacement) in FOLD_RULES {
        if s.contains(pattern) {
            s = s.replace(pattern, replacement);
        }
    }

    let mut s = collapse_runs(&s);

    if s.chars().last().is_some_and(is_vowel) {
        s.pop();
    }

    s
}

fn strip_locale_suffix(s: &str) -> &str {
    LOCALE_SUFFIXES
        .iter()
        .find_map(|suffix| s.strip_suffix(suffix))
        .unwrap_or(s)
}

fn collapse_runs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev = None;
    for c in s.chars() {
        if prev != Some(c) {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}
