//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during route authoring and fare allocation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeoError {
    /// Price or route distance cannot produce a meaningful per-km rate
    #[error("Invalid pricing input: {0}")]
    InvalidPricingInput(String),

    /// Two stopovers claim the same position in the route
    #[error("Duplicate stopover order: {0}")]
    DuplicateWaypointOrder(i32),

    /// Two stopovers share an id
    #[error("Duplicate stopover id: {0}")]
    DuplicateWaypointId(String),

    /// No stopover with this id
    #[error("Unknown stopover: {0}")]
    UnknownWaypoint(String),

    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

impl GeoError {
    /// True for failures of the fare allocation inputs, which callers surface as
    /// validation errors rather than recovering from.
    pub fn is_pricing_validation(&self) -> bool {
        matches!(
            self,
            GeoError::InvalidPricingInput(_) | GeoError::DuplicateWaypointOrder(_)
        )
    }
}
