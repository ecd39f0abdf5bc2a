//! Client configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STORAGE_DIR: &str = ".vitrina";

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the REST backend.
    pub api_base_url: String,
    /// Timeout applied to every backend call. Calls fail closed on expiry.
    pub request_timeout: Duration,
    /// Directory for the durable client state (cart, session).
    pub storage_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
        }
    }
}

impl Config {
    /// Loads configuration from `.env` and the process environment.
    /// Unset or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        if let Ok(url) = std::env::var("VITRINA_API_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(raw) = std::env::var("VITRINA_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => config.request_timeout = Duration::from_secs(secs),
                Err(_) => warn!(value = %raw, "invalid VITRINA_TIMEOUT_SECS, using default"),
            }
        }
        if let Ok(dir) = std::env::var("VITRINA_STORAGE_DIR") {
            config.storage_dir = PathBuf::from(dir);
        }
        config
    }
}
