//! CLI command implementations

pub mod geocode;
pub mod matching;
pub mod price;

use ridefare_core::config::Config;
use ridefare_core::error::{exit_codes, ErrorCode};
use ridefare_geo::GeoError;

/// State shared by every command
pub struct Context {
    /// Loaded configuration, defaults when no file was found
    pub config: Config,
    /// Print machine-readable JSON instead of text
    pub json: bool,
}

/// Lift a geo failure into the workspace error type
pub fn geo_error(err: GeoError) -> ridefare_core::Error {
    if err.is_pricing_validation() {
        ridefare_core::Error::invalid_pricing(err.to_string())
    } else {
        ridefare_core::Error::validation(err.to_string())
    }
}

/// Map a command failure to a process exit code
pub fn exit_code(err: &anyhow::Error) -> i32 {
    let Some(err) = err.downcast_ref::<ridefare_core::Error>() else {
        return exit_codes::FAILURE;
    };

    match err.code {
        ErrorCode::InputEmpty => exit_codes::VALIDATION_ERROR,
        code => match code.category() {
            "Configuration" => exit_codes::CONFIG_ERROR,
            "Geocoder" => exit_codes::GEOCODER_ERROR,
            "Validation" => exit_codes::VALIDATION_ERROR,
            _ => exit_codes::FAILURE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_by_category() {
        let cases = [
            (ridefare_core::Error::invalid_config("bad"), exit_codes::CONFIG_ERROR),
            (ridefare_core::Error::invalid_pricing("bad"), exit_codes::VALIDATION_ERROR),
            (
                ridefare_core::Error::geocoder(ErrorCode::RateLimited, "slow down"),
                exit_codes::GEOCODER_ERROR,
            ),
            (
                ridefare_core::Error::geocoder(ErrorCode::InputEmpty, "too short"),
                exit_codes::VALIDATION_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(exit_code(&anyhow::Error::new(err)), expected);
        }
        assert_eq!(exit_code(&anyhow::anyhow!("plain")), exit_codes::FAILURE);
    }

    #[test]
    fn test_geo_error_mapping() {
        let err = geo_error(GeoError::InvalidPricingInput("total price must be positive".into()));
        assert_eq!(err.code, ErrorCode::InvalidPricingInput);

        let err = geo_error(GeoError::DuplicateWaypointOrder(2));
        assert_eq!(err.code, ErrorCode::InvalidPricingInput);

        let err = geo_error(GeoError::DuplicateWaypointId("sur".into()));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
