//! Geocoding provider adapters.
//!
//! Defines the `GeocodingProvider` trait and the adapters for each
//! `ProviderKind`. Adapters are pure: they shape the request and decode
//! the response, while the client owns the network call.

pub mod google;
pub mod here;

use crate::config::GeocodingSettings;
use crate::credentials::Credentials;
use crate::types::{GeocodeError, Location, ProviderKind};

use google::GoogleProvider;
use here::HereProvider;

/// Request shaping and response parsing for one geocoding service.
pub trait GeocodingProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// URL the query is sent to.
    fn endpoint(&self) -> &str;

    /// Whether the credentials this provider needs are present.
    fn is_configured(&self) -> bool;

    /// Build the query string for `address`.
    ///
    /// Returns `MissingCredentials` when the provider is not configured,
    /// so no request is ever sent without keys.
    fn build_query(&self, address: &str) -> Result<Vec<(String, String)>, GeocodeError>;

    /// Decode a response body into the first matched location.
    fn parse_response(&self, body: &str) -> Result<Location, GeocodeError>;
}

/// Build adapters for `settings.providers`, in order, moving each
/// provider's credentials into its adapter.
///
/// A kind listed more than once is only used the first time.
pub fn build_providers(
    credentials: Credentials,
    settings: &GeocodingSettings,
) -> Vec<Box<dyn GeocodingProvider>> {
    let Credentials { google, here } = credentials;
    let mut google = Some(google);
    let mut here = Some(here);

    let mut providers: Vec<Box<dyn GeocodingProvider>> = Vec::with_capacity(settings.providers.len());
    for kind in &settings.providers {
        match kind {
            ProviderKind::Google => {
                if let Some(creds) = google.take() {
                    providers.push(Box::new(GoogleProvider::new(
                        creds,
                        settings.google_endpoint.clone(),
                    )));
                }
            }
            ProviderKind::Here => {
                if let Some(creds) = here.take() {
                    providers.push(Box::new(HereProvider::new(
                        creds,
                        settings.here_endpoint.clone(),
                        settings.here_anchor,
                    )));
                }
            }
        }
    }
    providers
}
