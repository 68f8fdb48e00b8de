//! Core domain types shared across geolocate.
//!
//! Contains coordinates, provider-tagged results, and the error
//! taxonomy used to classify a failed provider attempt.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A (latitude, longitude) pair as returned by a provider.
///
/// No range checking is applied; values are taken verbatim from the
/// provider response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// The pair in (lat, lng) order.
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// A coordinate together with the address the provider matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub coordinate: Coordinate,
    pub formatted_address: String,
}

/// A location tagged with the provider that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub provider: ProviderKind,
    pub location: Location,
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// The closed set of supported geocoding services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Google,
    Here,
}

impl ProviderKind {
    /// Default fallback order: Google first, HERE second.
    pub const DEFAULT_ORDER: [ProviderKind; 2] = [ProviderKind::Google, ProviderKind::Here];
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Google => write!(f, "Google Maps"),
            ProviderKind::Here => write!(f, "HERE"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a single provider attempt produced no coordinate.
///
/// None of these escape the client; they are logged and turned into
/// absence so the next provider can be tried.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("credentials not configured")]
    MissingCredentials,

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request rejected ({status}): {message}")]
    Rejected { status: String, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no results")]
    NoResults,
}

impl GeocodeError {
    /// Stable short name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            GeocodeError::MissingCredentials => "missing_credentials",
            GeocodeError::Timeout => "timeout",
            GeocodeError::Transport(_) => "transport",
            GeocodeError::Status(_) => "http_status",
            GeocodeError::Rejected { .. } => "rejected",
            GeocodeError::Malformed(_) => "malformed",
            GeocodeError::NoResults => "no_results",
        }
    }
}

impl From<serde_json::Error> for GeocodeError {
    fn from(e: serde_json::Error) -> Self {
        GeocodeError::Malformed(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
