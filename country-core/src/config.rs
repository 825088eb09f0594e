use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::directory::SortKey;

pub const DEFAULT_ENDPOINT: &str = "https://countries.trevorblades.com/";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org";
pub const API_KEY_ENV: &str = "OPEN_WEATHER_API_KEY";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP client shared by the country source and the weather provider.
/// Every request, including reading the body, is bounded by `timeout`.
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder().timeout(timeout).build().context("Failed to build HTTP client")
}

/// Weather provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeatherConfig {
    pub api_key: Option<String>,

    /// Override for the OpenWeather host, mostly useful for proxies.
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// endpoint = "https://countries.trevorblades.com/"
/// default_sort = "name"
///
/// [weather]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// GraphQL endpoint serving the `countries` query.
    pub endpoint: Option<String>,

    /// Sort applied when no `--sort` is given: "name" or "continent".
    pub default_sort: Option<String>,

    /// Per-request timeout for both remote services.
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub weather: WeatherConfig,
}

impl Config {
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn weather_base_url(&self) -> &str {
        self.weather.base_url.as_deref().unwrap_or(DEFAULT_WEATHER_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1))
    }

    pub fn default_sort(&self) -> Result<Option<SortKey>> {
        self.default_sort.as_deref().map(SortKey::try_from).transpose()
    }

    /// API key from the config file, falling back to `OPEN_WEATHER_API_KEY`.
    pub fn weather_api_key(&self) -> Option<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    fn resolve_api_key(&self, from_env: Option<String>) -> Option<String> {
        self.weather
            .api_key
            .clone()
            .or(from_env)
            .filter(|key| !key.trim().is_empty())
    }

    pub fn set_weather_api_key(&mut self, api_key: String) {
        self.weather.api_key = Some(api_key);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "country-directory", "countries")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
