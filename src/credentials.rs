//! Provider credentials.
//!
//! Keys are held as `SecretString` so they never show up in `Debug`
//! output. Empty values can be filled from environment variables and
//! then from key files; a source that is absent is only a warning.
//!
//! Key file formats:
//!
//! - Google: the API key on the first line.
//! - HERE: four lines, `app_id:` / `<id>` / `app_code:` / `<code>`.

use secrecy::{ExposeSecret, SecretString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where to look for credentials that were not supplied explicitly.
#[derive(Debug, Clone, Default)]
pub struct CredentialSources {
    pub google_key_env: Option<String>,
    pub google_key_file: Option<PathBuf>,
    pub here_id_env: Option<String>,
    pub here_code_env: Option<String>,
    pub here_key_file: Option<PathBuf>,
}

#[derive(Debug)]
pub struct GoogleCredentials {
    api_key: SecretString,
}

impl GoogleCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into().trim().to_string()),
        }
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.api_key().is_empty()
    }
}

#[derive(Debug)]
pub struct HereCredentials {
    app_id: SecretString,
    app_code: SecretString,
}

impl HereCredentials {
    pub fn new(app_id: impl Into<String>, app_code: impl Into<String>) -> Self {
        Self {
            app_id: SecretString::new(app_id.into().trim().to_string()),
            app_code: SecretString::new(app_code.into().trim().to_string()),
        }
    }

    pub fn app_id(&self) -> &str {
        self.app_id.expose_secret()
    }

    pub fn app_code(&self) -> &str {
        self.app_code.expose_secret()
    }

    /// HERE needs both halves; either one missing makes the pair unusable.
    pub fn is_empty(&self) -> bool {
        self.app_id().is_empty() || self.app_code().is_empty()
    }
}

/// Credentials for every supported provider.
#[derive(Debug)]
pub struct Credentials {
    pub google: GoogleCredentials,
    pub here: HereCredentials,
}

impl Credentials {
    pub fn new(
        google_api_key: impl Into<String>,
        here_app_id: impl Into<String>,
        here_app_code: impl Into<String>,
    ) -> Self {
        Self {
            google: GoogleCredentials::new(google_api_key),
            here: HereCredentials::new(here_app_id, here_app_code),
        }
    }

    /// No credentials at all; every provider will be skipped.
    pub fn empty() -> Self {
        Self::new("", "", "")
    }

    /// Fill empty credentials from the environment, then from key files.
    ///
    /// Explicit values always win. Never fails; a provider whose
    /// credentials are still empty afterwards is logged and will be
    /// skipped at lookup time.
    pub fn resolve(self, sources: &CredentialSources) -> Self {
        let google = if self.google.is_empty() {
            let key = from_env(sources.google_key_env.as_deref())
                .or_else(|| {
                    sources
                        .google_key_file
                        .as_deref()
                        .and_then(read_google_key_file)
                })
                .unwrap_or_default();
            GoogleCredentials::new(key)
        } else {
            self.google
        };

        if google.is_empty() {
            warn!("Google Maps API key not found; Google Maps lookups will be skipped");
        }

        let here = if self.here.is_empty() {
            let from_environment = from_env(sources.here_id_env.as_deref())
                .zip(from_env(sources.here_code_env.as_deref()));
            let (id, code) = from_environment
                .or_else(|| sources.here_key_file.as_deref().and_then(read_here_key_file))
                .unwrap_or_default();
            HereCredentials::new(id, code)
        } else {
            self.here
        };

        if here.is_empty() {
            warn!("HERE app_id/app_code not found; HERE lookups will be skipped");
        }

        Self { google, here }
    }
}

fn from_env(name: Option<&str>) -> Option<String> {
    let name = name?;
    let value = std::env::var(name).ok()?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    debug!(env = name, "Credential loaded from environment");
    Some(value.to_string())
}

fn read_key_file(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read key file");
            None
        }
    }
}

fn read_google_key_file(path: &Path) -> Option<String> {
    let contents = read_key_file(path)?;
    let key = parse_google_key(&contents);
    if key.is_none() {
        warn!(path = %path.display(), "Google key file is empty");
    }
    key
}

fn read_here_key_file(path: &Path) -> Option<(String, String)> {
    let contents = read_key_file(path)?;
    let pair = parse_here_keys(&contents);
    if pair.is_none() {
        warn!(path = %path.display(), "HERE key file is not in app_id/app_code format");
    }
    pair
}

/// First line of the file, trimmed.
pub(crate) fn parse_google_key(contents: &str) -> Option<String> {
    let key = contents.lines().next()?.trim();
    (!key.is_empty()).then(|| key.to_string())
}

/// Second and fourth lines of the file (the values under the
/// `app_id:` and `app_code:` labels), trimmed.
pub(crate) fn parse_here_keys(contents: &str) -> Option<(String, String)> {
    let lines: Vec<&str> = contents.lines().map(str::trim).collect();
    let id = lines.get(1).copied().filter(|s| !s.is_empty())?;
    let code = lines.get(3).copied().filter(|s| !s.is_empty())?;
    Some((id.to_string(), code.to_string()))
}
