//! Structured logging for ridefare tools
//!
//! - Compact or JSON log lines on stderr, so stdout stays machine-readable
//! - `RUST_LOG` overrides the configured level
//! - A per-process session ID attached to the startup event for correlation

use once_cell::sync::Lazy;
use ridefare_core::config::TelemetrySection;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};
use uuid::Uuid;

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize logging with defaults
pub fn init() -> anyhow::Result<()> {
    init_with_config(&TelemetryConfig::default())
}

/// Initialize with custom configuration
pub fn init_with_config(config: &TelemetryConfig) -> anyhow::Result<()> {
    let filter = build_filter(config)?;

    let fmt_layer = if config.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(config.show_target)
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(config.show_target)
            .boxed()
    };

    let subscriber = tracing_subscriber::registry().with(fmt_layer).with(filter);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

fn build_filter(config: &TelemetryConfig) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level)
        .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", config.log_level, e))
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info` or `ridefare_geocoder=debug`
    pub log_level: String,
    /// Emit JSON lines instead of compact text
    pub json: bool,
    /// Include the module path of each event
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::from_section(&TelemetrySection::default())
    }
}

impl TelemetryConfig {
    /// Build from the `[telemetry]` config section
    pub fn from_section(section: &TelemetrySection) -> Self {
        Self {
            log_level: section.log_level.clone(),
            json: section.json,
            show_target: false,
        }
    }

    /// Builder-style method to raise the level for `-v` flags
    #[must_use]
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        match verbose {
            0 => {}
            1 => self.log_level = "debug".to_string(),
            _ => {
                self.log_level = "trace".to_string();
                self.show_target = true;
            }
        }
        self
    }
}

/// Logs how long an operation took when stopped
pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Stop the timer and log the duration at debug level
    pub fn stop(self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = self.name,
            duration_ms = duration.as_millis(),
            "Timer completed"
        );
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_config_section() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.json);

        let section = TelemetrySection {
            log_level: "warn".into(),
            json: true,
        };
        let config = TelemetryConfig::from_section(&section);
        assert_eq!(config.log_level, "warn");
        assert!(config.json);
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(TelemetryConfig::default().with_verbosity(0).log_level, "info");
        assert_eq!(TelemetryConfig::default().with_verbosity(1).log_level, "debug");

        let trace = TelemetryConfig::default().with_verbosity(3);
        assert_eq!(trace.log_level, "trace");
        assert!(trace.show_target);
    }

    #[test]
    fn test_filter_directive() {
        let config = TelemetryConfig {
            log_level: "ridefare_geocoder=debug,info".into(),
            ..TelemetryConfig::default()
        };
        assert!(EnvFilter::try_new(&config.log_level).is_ok());
    }

    #[test]
    fn test_timer() {
        let timer = Timer::start("test_operation");
        std::thread::sleep(Duration::from_millis(10));
        let duration = timer.stop();
        assert!(duration.as_millis() >= 10);
    }

    #[test]
    fn test_session_id() {
        let id = session_id();
        assert!(!id.is_empty());
        // Should be a valid UUID
        assert!(Uuid::parse_str(id).is_ok());
    }
}
