//! Configuration loading from environment.

use std::env;
use std::path::PathBuf;

use fx_client::DEFAULT_API_URL;

/// Session file used when no data directory can be found.
const FALLBACK_STORE_PATH: &str = ".fx-session.json";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub store_location: String,
}

impl Config {
    /// Loads configuration from `FX_API_URL` and `FX_STORE_PATH`.
    pub fn from_env() -> Self {
        Self::new(env::var("FX_API_URL").ok(), env::var("FX_STORE_PATH").ok())
    }

    /// Fills unset or blank values with defaults.
    pub fn new(api_url: Option<String>, store_location: Option<String>) -> Self {
        let api_url = api_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let store_location = store_location
            .filter(|loc| !loc.trim().is_empty())
            .unwrap_or_else(default_store_location);

        Self {
            api_url,
            store_location,
        }
    }

    /// Command-line flags win over the environment.
    pub fn override_with(self, api_url: Option<String>, store_location: Option<String>) -> Self {
        Self::new(
            api_url.or(Some(self.api_url)),
            store_location.or(Some(self.store_location)),
        )
    }
}

/// `<data dir>/fx-widget/session.json`, or a dotfile in the working directory.
pub fn default_store_location() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("fx-widget").join("session.json"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_STORE_PATH))
        .to_string_lossy()
        .into_owned()
}
