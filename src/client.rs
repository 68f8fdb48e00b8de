//! Address resolution with provider fallback.
//!
//! `GeocodingClient` tries each configured provider in order and stops
//! at the first one that returns a location. Every failure of a single
//! attempt is logged with its own `kind` and turned into "no result
//! from this provider"; nothing escapes `resolve`.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{AppConfig, GeocodingSettings};
use crate::credentials::Credentials;
use crate::providers::{build_providers, GeocodingProvider};
use crate::transport::{HttpTransport, Transport};
use crate::types::{Coordinate, GeocodeError, Location, ProviderKind, Resolution};

pub struct GeocodingClient {
    providers: Vec<Box<dyn GeocodingProvider>>,
    transport: Arc<dyn Transport>,
}

impl GeocodingClient {
    /// Create a client that talks to the providers over HTTP.
    ///
    /// Missing credentials never fail construction; only building the
    /// HTTP client can.
    pub fn new(credentials: Credentials, settings: &GeocodingSettings) -> Result<Self> {
        let transport = HttpTransport::new(settings.timeout, &settings.user_agent)?;
        Ok(Self::with_transport(credentials, settings, Arc::new(transport)))
    }

    /// Create a client with an explicit transport.
    pub fn with_transport(
        credentials: Credentials,
        settings: &GeocodingSettings,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let providers = build_providers(credentials, settings);
        if providers.iter().all(|p| !p.is_configured()) {
            warn!("No geocoding provider has credentials; every lookup will fail");
        }
        Self {
            providers,
            transport,
        }
    }

    /// Resolve credentials from the configured environment variables and
    /// key files, then create an HTTP client.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let credentials = Credentials::empty().resolve(&config.credential_sources());
        Self::new(credentials, &config.settings())
    }

    /// Providers in the order they are tried.
    pub fn providers(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    /// Resolve `address` to a coordinate, or `None` if no provider could.
    pub async fn resolve(&self, address: &str) -> Option<Coordinate> {
        self.lookup(address)
            .await
            .map(|resolution| resolution.location.coordinate)
    }

    /// Like [`resolve`](Self::resolve), but also returns the matched
    /// address and the provider that produced it.
    pub async fn lookup(&self, address: &str) -> Option<Resolution> {
        for provider in &self.providers {
            let kind = provider.kind();
            info!(provider = %kind, "Getting latitude and longitude");

            match self.attempt(provider.as_ref(), address).await {
                Ok(location) => {
                    info!(
                        provider = %kind,
                        given_address = address,
                        formatted_address = %location.formatted_address,
                        location = %location.coordinate,
                        "Address resolved"
                    );
                    return Some(Resolution {
                        provider: kind,
                        location,
                    });
                }
                Err(e) => log_failure(kind, &e),
            }
        }

        warn!(
            address,
            tried = self.providers.len(),
            "Unable to resolve address from any provider"
        );
        None
    }

    /// One provider, one request, no retries.
    async fn attempt(
        &self,
        provider: &dyn GeocodingProvider,
        address: &str,
    ) -> Result<Location, GeocodeError> {
        let query = provider.build_query(address)?;
        let body = self.transport.get(provider.endpoint(), &query).await?;
        provider.parse_response(&body)
    }
}

fn log_failure(kind: ProviderKind, e: &GeocodeError) {
    match e {
        GeocodeError::MissingCredentials => {
            warn!(provider = %kind, kind = e.kind(), "Skipping provider: credentials not configured")
        }
        GeocodeError::NoResults => {
            info!(provider = %kind, kind = e.kind(), "Provider found no match")
        }
        GeocodeError::Timeout | GeocodeError::Transport(_) | GeocodeError::Status(_) => {
            warn!(provider = %kind, kind = e.kind(), error = %e, "Provider request failed")
        }
        GeocodeError::Rejected { .. } => {
            warn!(provider = %kind, kind = e.kind(), error = %e, "Provider rejected request")
        }
        GeocodeError::Malformed(_) => {
            warn!(provider = %kind, kind = e.kind(), error = %e, "Unexpected response from provider")
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
