//! Place suggestions: one geocoder search, at most one normalized retry, then ranking

use crate::error::{GeocodeError, GeocodeResult};
use crate::provider::Geocoder;
use ridefare_core::config::SearchSection;
use ridefare_search::{dedupe_by_place_id, normalize, Candidate, SuggestionRanker};
use std::time::Duration;
use tracing::{debug, warn};

/// Turns what the user typed into ranked place suggestions.
pub struct LocationMatcher<G> {
    geocoder: G,
    ranker: SuggestionRanker,
    min_query_chars: usize,
    retry_pause: Duration,
}

impl<G: Geocoder> LocationMatcher<G> {
    /// Matcher with default thresholds: two characters minimum, 500 ms retry pause
    pub fn new(geocoder: G) -> Self {
        Self::from_config(geocoder, &SearchSection::default())
    }

    /// Matcher configured from the `[search]` section
    pub fn from_config(geocoder: G, section: &SearchSection) -> Self {
        Self {
            geocoder,
            ranker: SuggestionRanker::new(section.min_score, section.max_suggestions),
            min_query_chars: section.min_query_chars,
            retry_pause: Duration::from_millis(section.retry_pause_ms),
        }
    }

    /// Builder-style method to set the ranker
    #[must_use]
    pub fn with_ranker(mut self, ranker: SuggestionRanker) -> Self {
        self.ranker = ranker;
        self
    }

    /// Builder-style method to set the pause before the normalized retry
    #[must_use]
    pub fn with_retry_pause(mut self, pause: Duration) -> Self {
        self.retry_pause = pause;
        self
    }

    /// The underlying geocoder
    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Ranked suggestions for `query`, surfacing why there are none.
    ///
    /// The trimmed query goes to the geocoder as typed. When that finds
    /// nothing and the normalized spelling differs, the matcher pauses and
    /// searches once more with the normalized spelling, unless that spelling is
    /// itself shorter than the minimum query length. Candidates from both
    /// rounds are merged, deduplicated by place id and ranked against the
    /// original query.
    ///
    /// # Errors
    /// - [`GeocodeError::InputEmpty`] for queries shorter than the minimum,
    ///   without contacting the geocoder
    /// - any geocoder error from either round; a throttled first round is
    ///   never retried
    pub async fn try_suggest(&self, query: &str) -> GeocodeResult<Vec<Candidate>> {
        let query = query.trim();
        if query.chars().count() < self.min_query_chars {
            return Err(GeocodeError::InputEmpty {
                min_chars: self.min_query_chars,
            });
        }

        let mut candidates = self.geocoder.search(query).await?;

        if candidates.is_empty() {
            let normalized = normalize(query);
            if normalized.chars().count() < self.min_query_chars {
                debug!(query, normalized = %normalized, "Normalized spelling too short, skipping retry");
            } else if normalized != query.to_lowercase() {
                debug!(
                    query,
                    normalized = %normalized,
                    pause_ms = self.retry_pause.as_millis(),
                    "No candidates, retrying with normalized spelling"
                );
                tokio::time::sleep(self.retry_pause).await;
                candidates.extend(self.geocoder.search(&normalized).await?);
            }
        }

        let merged = dedupe_by_place_id(candidates);
        Ok(self.ranker.rank(query, &merged))
    }

    /// Ranked suggestions for `query`; any failure becomes an empty list.
    ///
    /// Search is advisory, so failures are logged and swallowed here.
    pub async fn suggest(&self, query: &str) -> Vec<Candidate> {
        match self.try_suggest(query).await {
            Ok(suggestions) => suggestions,
            Err(GeocodeError::InputEmpty { min_chars }) => {
                debug!(min_chars, "Query too short, skipping geocoder");
                Vec::new()
            }
            Err(e) if e.is_rate_limited() => {
                warn!(error = %e, "Geocoder rate limited, no suggestions");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, code = %e.code(), "Geocoder failed, no suggestions");
                Vec::new()
            }
        }
    }
}
