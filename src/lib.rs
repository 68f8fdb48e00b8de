//! geolocate: resolve free-text addresses to coordinates.
//!
//! Queries Google Maps first and falls back to HERE when Google yields
//! nothing. Library crate exposing all modules for use by integration
//! tests and the binary entry point.

pub mod client;
pub mod config;
pub mod credentials;
pub mod providers;
pub mod transport;
pub mod types;

pub use client::GeocodingClient;
pub use credentials::Credentials;
pub use types::{Coordinate, GeocodeError, Location, ProviderKind, Resolution};
