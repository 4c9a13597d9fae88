//! Place-name matching for noisy geocoder results.
//!
//! Users type Indian place names in whatever Latin spelling they know
//! ("Tirupathi", "Vishakapatnam", "Hydrabad"). Geocoders answer with their own
//! spelling and plenty of unrelated hits. This crate provides:
//! - Text normalization that folds common transliteration variants together
//! - A Soundex-style phonetic code over the normalized text
//! - Levenshtein distance, similarity ratio and a composed "sounds alike" check
//! - Alternate spellings of a query for retry/expansion
//! - Relevance scoring and ranking of geocoder candidates
//!
//! # Example
//!
//! ```
//! use ridefare_search::{are_phonetically_similar, normalize, phonetic_code};
//!
//! assert_eq!(normalize("Tirupathi"), normalize("Tirupati"));
//! assert_eq!(phonetic_code("Tirupathi").len(), 6);
//! assert!(are_phonetically_similar("Tirupati", "Tirupathi"));
//! ```

mod candidate;
mod fuzzy;
mod normalize;
mod phonetic;
mod ranking;
mod variations;

pub use candidate::{Address, Candidate};
pub use fuzzy::{are_phonetically_similar, levenshtein_distance, similarity};
pub use normalize::normalize;
pub use phonetic::{phonetic_code, PHONETIC_CODE_LEN};
pub use ranking::{dedupe_by_place_id, score_candidate, ScoredCandidate, SuggestionRanker};
pub use variations::{generate_variations, MAX_VARIATIONS};
