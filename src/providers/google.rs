//! Google Maps Geocoding API adapter.
//!
//! API: `https://maps.googleapis.com/maps/api/geocode/json`
//! Auth: API key via `key` query param.
//!
//! The coordinate is taken from `results[0].geometry.location`, along
//! with `results[0].formatted_address`.

use serde::Deserialize;

use super::GeocodingProvider;
use crate::credentials::GoogleCredentials;
use crate::types::{Coordinate, GeocodeError, Location, ProviderKind};

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
    #[serde(default)]
    formatted_address: String,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Statuses that mean "request was fine, nothing matched".
const EMPTY_STATUSES: &[&str] = &["OK", "ZERO_RESULTS"];

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

pub struct GoogleProvider {
    credentials: GoogleCredentials,
    endpoint: String,
}

impl GoogleProvider {
    pub fn new(credentials: GoogleCredentials, endpoint: String) -> Self {
        Self {
            credentials,
            endpoint,
        }
    }
}

impl GeocodingProvider for GoogleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn is_configured(&self) -> bool {
        !self.credentials.is_empty()
    }

    fn build_query(&self, address: &str) -> Result<Vec<(String, String)>, GeocodeError> {
        if !self.is_configured() {
            return Err(GeocodeError::MissingCredentials);
        }
        Ok(vec![
            ("address".to_string(), address.to_string()),
            ("key".to_string(), self.credentials.api_key().to_string()),
        ])
    }

    fn parse_response(&self, body: &str) -> Result<Location, GeocodeError> {
        let resp: GeocodeResponse = serde_json::from_str(body)?;

        let Some(first) = resp.results.into_iter().next() else {
            return Err(match resp.status {
                Some(status) if !EMPTY_STATUSES.contains(&status.as_str()) => {
                    GeocodeError::Rejected {
                        status,
                        message: resp.error_message.unwrap_or_default(),
                    }
                }
                _ => GeocodeError::NoResults,
            });
        };

        let LatLng { lat, lng } = first.geometry.location;
        Ok(Location {
            coordinate: Coordinate::new(lat, lng),
            formatted_address: first.formatted_address,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
