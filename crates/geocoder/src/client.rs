//! Nominatim HTTP client

use crate::config::GeocoderConfig;
use crate::error::{GeocodeError, GeocodeResult};
use crate::provider::Geocoder;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use ridefare_core::rate_limit::RateLimiter;
use ridefare_geo::Coordinate;
use ridefare_search::Candidate;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Rate limit bucket for forward searches
const SEARCH_KEY: &str = "search";
/// Rate limit bucket for reverse lookups
const REVERSE_KEY: &str = "reverse";

/// Longest provider error body kept in [`GeocodeError::ProviderUnavailable`]
const MAX_ERROR_BODY: usize = 200;

/// Client for a Nominatim-compatible geocoder
///
/// Every request:
/// - waits its turn on a per-endpoint token bucket (one request per second by default)
/// - carries the configured `User-Agent` and a fresh `X-Request-ID`
/// - fails fast with [`GeocodeError::RateLimited`] while a 429 cooldown runs
///
/// Throttled requests are never retried here; the caller decides what to do.
#[derive(Clone)]
pub struct NominatimClient {
    inner: Client,
    config: Arc<GeocoderConfig>,
    rate_limiter: Arc<RateLimiter>,
    throttle: Arc<Mutex<Throttle>>,
}

/// 429 bookkeeping
#[derive(Debug, Default)]
struct Throttle {
    consecutive: u32,
    until: Option<Instant>,
}

impl NominatimClient {
    /// Create a client with defaults and environment overrides
    ///
    /// # Errors
    /// Fails when the configuration is invalid or the HTTP client cannot be built.
    pub fn new() -> GeocodeResult<Self> {
        Self::with_config(GeocoderConfig::from_env())
    }

    /// Create a new client with specific configuration
    ///
    /// # Errors
    /// Fails when the configuration is invalid or the HTTP client cannot be built.
    pub fn with_config(config: GeocoderConfig) -> GeocodeResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let inner = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(default_headers)
            .build()?;

        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));

        Ok(Self {
            inner,
            config: Arc::new(config),
            rate_limiter,
            throttle: Arc::new(Mutex::new(Throttle::default())),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    /// Time left on the 429 cooldown, if one is running
    #[must_use]
    pub fn cooldown_remaining(&self) -> Option<Duration> {
        let throttle = self.throttle.lock().unwrap_or_else(PoisonError::into_inner);
        throttle
            .until
            .and_then(|until| until.checked_duration_since(Instant::now()))
            .filter(|remaining| !remaining.is_zero())
    }

    /// Forget any 429 cooldown and pacing state
    pub fn reset_throttle(&self) {
        *self.throttle.lock().unwrap_or_else(PoisonError::into_inner) = Throttle::default();
        self.rate_limiter.reset(SEARCH_KEY);
        self.rate_limiter.reset(REVERSE_KEY);
    }

    /// Forward search: `GET {base}/search?q=..`
    ///
    /// # Errors
    /// See [`GeocodeError`]; callers usually treat every variant as "no candidates".
    #[instrument(skip(self), fields(request_id))]
    pub async fn search(&self, query: &str) -> GeocodeResult<Vec<Candidate>> {
        let limit = self.config.limit.to_string();
        let mut params = vec![
            ("q", query),
            ("format", "json"),
            ("addressdetails", "1"),
            ("limit", limit.as_str()),
            ("dedupe", "1"),
        ];
        if !self.config.country_codes.is_empty() {
            params.push(("countrycodes", self.config.country_codes.as_str()));
        }

        let candidates: Vec<Candidate> = self.get(SEARCH_KEY, "search", &params).await?;
        debug!(query, count = candidates.len(), "Geocoder search returned");
        Ok(candidates)
    }

    /// Reverse lookup: `GET {base}/reverse?lat=..&lon=..`
    ///
    /// # Errors
    /// See [`GeocodeError`]. A coordinate with nothing nearby comes back as
    /// [`GeocodeError::Decode`], since the provider answers with an error object.
    #[instrument(skip(self), fields(request_id))]
    pub async fn reverse(&self, at: Coordinate) -> GeocodeResult<Candidate> {
        let lat = at.latitude.to_string();
        let lon = at.longitude.to_string();
        let params = [
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("format", "json"),
            ("addressdetails", "1"),
        ];

        self.get(REVERSE_KEY, "reverse", &params).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        bucket: &str,
        path: &str,
        params: &[(&str, &str)],
    ) -> GeocodeResult<T> {
        if let Some(remaining) = self.cooldown_remaining() {
            debug!(
                remaining_ms = remaining.as_millis(),
                "Geocoder cooldown running, not sending request"
            );
            return Err(GeocodeError::RateLimited {
                retry_after: Some(remaining),
            });
        }

        let wait = self.rate_limiter.reserve(bucket);
        if !wait.is_zero() {
            debug!(bucket, wait_ms = wait.as_millis(), "Waiting for geocoder rate limit");
            tokio::time::sleep(wait).await;
        }

        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);

        let start = Instant::now();
        let response = self
            .inner
            .get(&url)
            .header(X_REQUEST_ID, &request_id)
            .query(params)
            .send()
            .await
            .inspect_err(|e| warn!(request_id = %request_id, url = %url, error = %e, "Geocoder request failed"))?;

        debug!(
            request_id = %request_id,
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            "Geocoder responded"
        );

        self.handle_response(&request_id, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        request_id: &str,
        response: Response,
    ) -> GeocodeResult<T> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(response.headers());
            let cooldown = self.record_throttled(retry_after);
            warn!(
                request_id,
                cooldown_ms = cooldown.as_millis(),
                "Geocoder rate limited the client"
            );
            return Err(GeocodeError::RateLimited {
                retry_after: Some(cooldown),
            });
        }

        if !status.is_success() {
            let mut message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            truncate_chars(&mut message, MAX_ERROR_BODY);
            warn!(request_id, status = status.as_u16(), "Geocoder unavailable");
            return Err(GeocodeError::unavailable(status.as_u16(), message));
        }

        self.record_success();
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(request_id, error = %e, "Geocoder returned malformed JSON");
            GeocodeError::Decode(e)
        })
    }

    /// Start or extend the cooldown; returns its length
    fn record_throttled(&self, retry_after: Option<Duration>) -> Duration {
        let mut throttle = self.throttle.lock().unwrap_or_else(PoisonError::into_inner);
        throttle.consecutive = throttle.consecutive.saturating_add(1);

        let backoff = self.config.cooldown.delay_for_attempt(throttle.consecutive);
        let cooldown = retry_after.map_or(backoff, |asked| asked.max(backoff));
        throttle.until = Some(Instant::now() + cooldown);
        cooldown
    }

    fn record_success(&self) {
        let mut throttle = self.throttle.lock().unwrap_or_else(PoisonError::into_inner);
        throttle.consecutive = 0;
        throttle.until = None;
    }
}

impl Geocoder for NominatimClient {
    async fn search(&self, query: &str) -> GeocodeResult<Vec<Candidate>> {
        NominatimClient::search(self, query).await
    }

    async fn reverse(&self, at: Coordinate) -> GeocodeResult<Candidate> {
        NominatimClient::reverse(self, at).await
    }
}

/// `Retry-After` in delta-seconds form; HTTP dates are ignored
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
        .map(Duration::from_secs)
}

fn truncate_chars(text: &mut String, max: usize) {
    if let Some((idx, _)) = text.char_indices().nth(max) {
        text.truncate(idx);
    }
}
