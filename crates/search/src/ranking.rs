//! Relevance scoring and ranking of geocoder candidates.

use crate::{are_phonetically_similar, similarity, Candidate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Clean name equals the query
pub const EXACT_SCORE: f64 = 100.0;
/// Clean name starts with the query
pub const PREFIX_SCORE: f64 = 90.0;
/// Clean name contains the query
pub const CONTAINS_SCORE: f64 = 80.0;
/// Clean name is a spelling variant of the query
pub const PHONETIC_SCORE: f64 = 70.0;
/// Weight of the similarity ratio when nothing better matched
pub const SIMILARITY_WEIGHT: f64 = 60.0;
/// Bonus for city-grade places
pub const CITY_BONUS: f64 = 5.0;
/// Bonus for towns; villages get none
pub const TOWN_BONUS: f64 = 3.0;

/// A candidate together with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// The geocoder result
    pub candidate: Candidate,
    /// Relevance, roughly 0 to 105 (higher is better)
    pub score: f64,
}

/// Score one candidate against the user's query.
///
/// Tiers against the candidate's clean name: exact 100, prefix 90, substring
/// 80, spelling variant 70, otherwise `similarity × 60`. A locality bonus is
/// added on top (+5 city, else +3 town), so an exact city match scores 105 and
/// cities outrank equally matching towns.
pub fn score_candidate(query: &str, candidate: &Candidate) -> f64 {
    let query = query.trim().to_lowercase();
    let name = candidate.clean_name();

    let base = if name == query {
        EXACT_SCORE
    } else if name.starts_with(&query) {
        PREFIX_SCORE
    } else if name.contains(&query) {
        CONTAINS_SCORE
    } else if are_phonetically_similar(&name, &query) {
        PHONETIC_SCORE
    } else {
        similarity(&name, &query) * SIMILARITY_WEIGHT
    };

    base + locality_bonus(candidate)
}

fn locality_bonus(candidate: &Candidate) -> f64 {
    if candidate.address.city.is_some() {
        CITY_BONUS
    } else if candidate.address.town.is_some() {
        TOWN_BONUS
    } else {
        0.0
    }
}

/// Drop repeated `place_id`s, keeping the first occurrence and the original order.
pub fn dedupe_by_place_id(candidates: impl IntoIterator<Item = Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.place_id))
        .collect()
}

/// Orders geocoder candidates by relevance to a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRanker {
    /// Candidates scoring below this are dropped
    pub min_score: f64,
    /// Maximum number of suggestions returned
    pub max_results: usize,
}

impl Default for SuggestionRanker {
    fn default() -> Self {
        Self {
            min_score: 30.0,
            max_results: 7,
        }
    }
}

impl SuggestionRanker {
    /// Create a ranker with explicit thresholds
    #[must_use]
    pub fn new(min_score: f64, max_results: usize) -> Self {
        Self {
            min_score,
            max_results,
        }
    }

    /// Deduplicate, score, filter and sort candidates, keeping their scores.
    ///
    /// The sort is stable, so equal scores keep the geocoder's order.
    pub fn rank_scored(&self, query: &str, candidates: &[Candidate]) -> Vec<ScoredCandidate> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ScoredCandidate> = dedupe_by_place_id(candidates.iter().cloned())
            .into_iter()
            .map(|candidate| ScoredCandidate {
                score: score_candidate(query, &candidate),
                candidate,
            })
            .filter(|s| s.score >= self.min_score)
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.max_results);
        scored
    }

    /// Ranked candidates without their scores.
    ///
    /// # Example
    /// ```
    /// use ridefare_search::{Candidate, SuggestionRanker};
    ///
    /// let candidates = vec![
    ///     Candidate::new(1, "Vijayanagaram, Andhra Pradesh, India", 18.1, 83.4),
    ///     Candidate::new(2, "Vijayawada, Andhra Pradesh, India", 16.5, 80.6),
    /// ];
    ///
    /// let ranked = SuggestionRanker::default().rank("vijayawada", &candidates);
    /// assert_eq!(ranked[0].place_id, 2);
    /// ```
    pub fn rank(&self, query: &str, candidates: &[Candidate]) -> Vec<Candidate> {
        self.rank_scored(query, candidates)
            .into_iter()
            .map(|s| s.candidate)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Address;
    use proptest::prelude::*;

    fn city(id: i64, name: &str) -> Candidate {
        Candidate::new(id, format!("{name}, Andhra Pradesh, India"), 16.0, 80.0).with_address(
            Address {
                city: Some(name.to_string()),
                ..Address::default()
            },
        )
    }

    fn town(id: i64, name: &str) -> Candidate {
        Candidate::new(id, format!("{name}, Andhra Pradesh, India"), 16.0, 80.0).with_address(
            Address {
                town: Some(name.to_string()),
                ..Address::default()
            },
        )
    }

    fn plain(id: i64, name: &str) -> Candidate {
        Candidate::new(id, format!("{name}, Andhra Pradesh, India"), 16.0, 80.0)
    }

    #[test]
    fn test_exact_city_scores_105() {
        let score = score_candidate("Vijayawada", &city(1, "Vijayawada"));
        assert!((score - 105.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exact_without_locality_scores_100() {
        let score = score_candidate("vijayawada", &plain(1, "Vijayawada"));
        assert!((score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_tiers() {
        assert!((score_candidate("guntu", &plain(1, "Guntur")) - 90.0).abs() < f64::EPSILON);
        assert!((score_candidate("untu", &plain(1, "Guntur")) - 80.0).abs() < f64::EPSILON);
        assert!((score_candidate("tirupathi", &plain(1, "Tirupati")) - 70.0).abs() < f64::EPSILON);
        assert!((score_candidate("tirupathi", &town(1, "Tirupati")) - 73.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_similarity_fallback() {
        // nothing in common: similarity 0
        let score = score_candidate("xyz", &plain(1, "Ongole"));
        assert!(score.abs() < f64::EPSILON);
    }

    #[test]
    fn test_city_outranks_equal_town() {
        let candidates = vec![town(1, "Nellore"), city(2, "Nellore")];
        let ranked = SuggestionRanker::default().rank("nellore", &candidates);
        assert_eq!(ranked.iter().map(|c| c.place_id).collect::<Vec<_>>(), [2, 1]);
    }

    #[test]
    fn test_ties_keep_geocoder_order() {
        let candidates = vec![plain(3, "Kavali"), plain(1, "Kavali"), plain(2, "Kavali")];
        let ranked = SuggestionRanker::default().rank("kavali", &candidates);
        assert_eq!(ranked.iter().map(|c| c.place_id).collect::<Vec<_>>(), [3, 1, 2]);
    }

    #[test]
    fn test_duplicates_first_occurrence_wins() {
        let candidates = vec![plain(1, "Eluru"), city(1, "Eluru"), plain(2, "Eluru")];
        let ranked = SuggestionRanker::default().rank_scored("eluru", &candidates);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].candidate.place_id, 1);
        assert!((ranked[0].score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_low_scores_filtered() {
        let candidates = vec![plain(1, "Ongole"), plain(2, "Guntur")];
        assert!(SuggestionRanker::default().rank("xyz", &candidates).is_empty());
    }

    #[test]
    fn test_truncates_to_max_results() {
        let candidates: Vec<Candidate> = (0..12).map(|i| plain(i, "Kadapa")).collect();
        assert_eq!(SuggestionRanker::default().rank("kadapa", &candidates).len(), 7);
        assert_eq!(SuggestionRanker::new(30.0, 3).rank("kadapa", &candidates).len(), 3);
    }

    #[test]
    fn test_empty_query_ranks_nothing() {
        let candidates = vec![plain(1, "Kadapa")];
        assert!(SuggestionRanker::default().rank("  ", &candidates).is_empty());
    }

    #[test]
    fn test_dedupe_preserves_order() {
        let deduped = dedupe_by_place_id(vec![plain(2, "a"), plain(1, "b"), plain(2, "c")]);
        assert_eq!(deduped.iter().map(|c| c.place_id).collect::<Vec<_>>(), [2, 1]);
        assert_eq!(deduped[0].display_name, "a, Andhra Pradesh, India");
    }

    fn arb_candidate() -> impl Strategy<Value = Candidate> {
        (0i64..10, "[a-z]{2,10}", 0u8..3).prop_map(|(id, name, kind)| match kind {
            0 => city(id, &name),
            1 => town(id, &name),
            _ => plain(id, &name),
        })
    }

    proptest! {
        #[test]
        fn prop_rank_invariants(
            query in "[a-z]{2,8}",
            candidates in prop::collection::vec(arb_candidate(), 0..20),
        ) {
            let ranked = SuggestionRanker::default().rank_scored(&query, &candidates);

            prop_assert!(ranked.len() <= 7);

            let ids: HashSet<i64> = ranked.iter().map(|s| s.candidate.place_id).collect();
            prop_assert_eq!(ids.len(), ranked.len());

            for window in ranked.windows(2) {
                prop_assert!(window[0].score >= window[1].score);
            }
            for s in &ranked {
                prop_assert!(s.score >= 30.0);
                prop_assert!(s.score <= 105.0);
            }
        }
    }
}
