//! Edit distance and the composed "sounds alike" check.

use crate::{normalize, phonetic_code};

/// Calculate Levenshtein edit distance between two strings, ignoring case.
///
/// Unit cost for insertion, deletion and substitution, counted in characters.
///
/// # Example
/// ```
/// use ridefare_search::levenshtein_distance;
///
/// assert_eq!(levenshtein_distance("Nellore", "nelore"), 1);
/// ```
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.to_lowercase().chars().collect();
    let b_chars: Vec<char> = b.to_lowercase().chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows of the (m+1)x(n+1) table are enough
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Similarity ratio in `[0, 1]`: `1 - distance / max(len)`.
///
/// Two empty strings are identical and score `1.0`.
#[allow(clippy::cast_precision_loss)]
pub fn similarity(a: &str, b: &str) -> f64 {
    let len_a = a.to_lowercase().chars().count();
    let len_b = b.to_lowercase().chars().count();
    let longest = len_a.max(len_b);

    if longest == 0 {
        return 1.0;
    }

    1.0 - levenshtein_distance(a, b) as f64 / longest as f64
}

/// Decide whether two place names are spelling variants of each other.
///
/// True when any of these hold:
/// 1. the normalized forms are equal
/// 2. one non-empty normalized form contains the other
/// 3. the phonetic codes are equal
/// 4. the normalized forms are within `max(2, longest / 3)` edits
///
/// # Example
/// ```
/// use ridefare_search::are_phonetically_similar;
///
/// assert!(are_phonetically_similar("Tirupati", "Tirupathi"));
/// assert!(!are_phonetically_similar("Mumbai", "Delhi"));
/// ```
pub fn are_phonetically_similar(a: &str, b: &str) -> bool {
    let norm_a = normalize(a);
    let norm_b = normalize(b);

    if norm_a == norm_b {
        return true;
    }

    // An empty form is a substring of everything and would match any name
    if !norm_a.is_empty()
        && !norm_b.is_empty()
        && (norm_a.contains(norm_b.as_str()) || norm_b.contains(norm_a.as_str()))
    {
        return true;
    }

    if phonetic_code(a) == phonetic_code(b) {
        return true;
    }

    let longest = norm_a.chars().count().max(norm_b.chars().count());
    let threshold = 2.max(longest / 3);
    levenshtein_distance(&norm_a, &norm_b) <= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_levenshtein_same() {
        assert_eq!(levenshtein_distance("guntur", "guntur"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein_distance("guntur", "guntor"), 1);
    }

    #[test]
    fn test_levenshtein_insert_delete() {
        assert_eq!(levenshtein_distance("nelore", "nellore"), 1);
        assert_eq!(levenshtein_distance("nellore", "nelore"), 1);
    }

    #[test]
    fn test_levenshtein_ignores_case() {
        assert_eq!(levenshtein_distance("Ongole", "ONGOLE"), 0);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein_distance("", "kadapa"), 6);
        assert_eq!(levenshtein_distance("kadapa", ""), 6);
    }

    #[test]
    fn test_similarity_bounds() {
        assert!((similarity("", "") - 1.0).abs() < f64::EPSILON);
        assert!((similarity("abc", "abc") - 1.0).abs() < f64::EPSILON);
        assert!(similarity("abc", "xyz").abs() < f64::EPSILON);
        assert!((similarity("kurnool", "karnool") - (1.0 - 1.0 / 7.0)).abs() < 1e-9);
    }

    #[test]
    fn test_similar_transliterations() {
        assert!(are_phonetically_similar("Tirupati", "Tirupathi"));
        assert!(are_phonetically_similar("Vizag", "Visag"));
        assert!(are_phonetically_similar("Secunderabad", "Secundrabad"));
    }

    #[test]
    fn test_substring_rule() {
        assert!(are_phonetically_similar("Rajahmundry", "Rajahmundry Rural"));
    }

    #[test]
    fn test_unrelated_names() {
        assert!(!are_phonetically_similar("Mumbai", "Delhi"));
        assert!(!are_phonetically_similar("Chennai", "Kolkata"));
    }

    #[test]
    fn test_empty_form_is_not_a_wildcard() {
        // "a" normalizes to "", which must not match via the substring rule
        assert!(!are_phonetically_similar("a", "Bengaluru"));
    }

    proptest! {
        #[test]
        fn prop_distance_symmetric(a in "[a-zA-Z]{0,16}", b in "[a-zA-Z]{0,16}") {
            prop_assert_eq!(levenshtein_distance(&a, &b), levenshtein_distance(&b, &a));
        }

        #[test]
        fn prop_distance_to_self_is_zero(a in "[a-zA-Z ]{0,16}") {
            prop_assert_eq!(levenshtein_distance(&a, &a), 0);
        }

        #[test]
        fn prop_similarity_in_unit_range(a in "[a-zA-Z]{1,16}", b in "[a-zA-Z]{1,16}") {
            let s = similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&s), "similarity {} out of range", s);
        }

        #[test]
        fn prop_similar_is_symmetric(a in "[a-z]{1,12}", b in "[a-z]{1,12}") {
            prop_assert_eq!(are_phonetically_similar(&a, &b), are_phonetically_similar(&b, &a));
        }
    }
}
