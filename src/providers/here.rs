//! HERE Places adapter.
//!
//! API: `https://places.cit.api.here.com/places/v1/discover/search`
//! Auth: `app_id` + `app_code` query params.
//!
//! Discover search needs a search anchor (`at`); the configured anchor
//! is sent with every request. The coordinate is `position` of the
//! first item, and the formatted address is `"{title}, {vicinity}"`.

use serde::Deserialize;

use super::GeocodingProvider;
use crate::credentials::HereCredentials;
use crate::types::{Coordinate, GeocodeError, Location, ProviderKind};

#[derive(Debug, Deserialize)]
struct DiscoverResponse {
    results: DiscoverResults,
}

#[derive(Debug, Deserialize)]
struct DiscoverResults {
    items: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    position: Vec<f64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    vicinity: String,
}

pub struct HereProvider {
    credentials: HereCredentials,
    endpoint: String,
    anchor: Coordinate,
}

impl HereProvider {
    pub fn new(credentials: HereCredentials, endpoint: String, anchor: Coordinate) -> Self {
        Self {
            credentials,
            endpoint,
            anchor,
        }
    }

    fn format_anchor(&self) -> String {
        format!("{:.4},{:.4}", self.anchor.latitude, self.anchor.longitude)
    }
}

impl GeocodingProvider for HereProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Here
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
            ("at".to_string(), self.format_anchor()),
            ("q".to_string(), address.to_string()),
            ("app_id".to_string(), self.credentials.app_id().to_string()),
            ("app_code".to_string(), self.credentials.app_code().to_string()),
        ])
    }

    fn parse_response(&self, body: &str) -> Result<Location, GeocodeError> {
        let resp: DiscoverResponse = serde_json::from_str(body)?;
        let place = resp
            .results
            .items
            .into_iter()
            .next()
            .ok_or(GeocodeError::NoResults)?;

        let &[lat, lng] = place.position.as_slice() else {
            return Err(GeocodeError::Malformed(format!(
                "position has {} elements, expected 2",
                place.position.len()
            )));
        };

        Ok(Location {
            coordinate: Coordinate::new(lat, lng),
            formatted_address: format!("{}, {}", place.title, place.vicinity),
        })
    }
}
