//! geolocate command-line entry point.
//!
//! Loads `.env` and configuration, initialises structured logging, and
//! resolves every address given on the command line.
//!
//! Usage: `geolocate <ADDRESS>...`

use anyhow::Result;
use std::process::ExitCode;
use tracing::{info, warn};

use geolocate::config::AppConfig;
use geolocate::GeocodingClient;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let addresses: Vec<String> = std::env::args().skip(1).collect();
    if addresses.is_empty() {
        eprintln!("usage: geolocate <ADDRESS>...");
        return Ok(ExitCode::from(2));
    }

    let config_path =
        std::env::var("GEOLOCATE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let cfg = AppConfig::load_or_default(&config_path)?;

    let client = GeocodingClient::from_config(&cfg)?;
    info!(providers = ?client.providers(), "geolocate ready");

    let mut unresolved = 0usize;
    for address in &addresses {
        match client.resolve(address).await {
            Some(coord) => println!("{address}: {}, {}", coord.latitude, coord.longitude),
            None => {
                unresolved += 1;
                println!("{address}: not found");
            }
        }
    }

    if unresolved > 0 {
        warn!(unresolved, total = addresses.len(), "Some addresses could not be resolved");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("geolocate=info"));

    let json_logging = std::env::var("GEOLOCATE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
