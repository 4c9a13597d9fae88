//! Geocoder candidates as they come off the wire.

use serde::{Deserialize, Deserializer, Serialize};

/// Structured address parts of a candidate. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// City name, present for city-grade places
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Town name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    /// Village name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    /// State or union territory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Country name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// A single geocoder result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Full comma separated label, most specific part first
    #[serde(rename = "display_name", alias = "displayName")]
    pub display_name: String,
    /// Latitude in degrees
    #[serde(deserialize_with = "number_or_string")]
    pub lat: f64,
    /// Longitude in degrees
    #[serde(deserialize_with = "number_or_string")]
    pub lon: f64,
    /// Provider identifier, used for deduplication
    #[serde(rename = "place_id", alias = "placeId")]
    pub place_id: i64,
    /// Structured address, when the provider was asked for address details
    #[serde(default)]
    pub address: Address,
}

impl Candidate {
    /// Create a candidate without address details.
    pub fn new(place_id: i64, display_name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            display_name: display_name.into(),
            lat,
            lon,
            place_id,
            address: Address::default(),
        }
    }

    /// Builder-style method to set the address
    #[must_use]
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    /// Shortest recognizable label: city, else town, else village, else the
    /// first segment of the display name. Case-folded and trimmed.
    pub fn clean_name(&self) -> String {
        let address = &self.address;
        let label = address
            .city
            .as_deref()
            .or(address.town.as_deref())
            .or(address.village.as_deref())
            .unwrap_or_else(|| self.display_name.split(',').next().unwrap_or_default());

        label.trim().to_lowercase()
    }
}

// Nominatim sends coordinates as strings ("16.5062"), other providers as numbers.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
