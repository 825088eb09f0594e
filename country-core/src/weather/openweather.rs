use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::http_client,
    error::{DirectoryError, truncate_body},
    model::{Coordinates, WeatherSnapshot},
};

use super::{WeatherProvider, kelvin_to_celsius};

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: http_client(timeout)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: Option<i64>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

/// The request carries no `units` parameter, so `main.temp` is in Kelvin.
fn parse_current(body: &str) -> Result<WeatherSnapshot> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).context("Failed to parse OpenWeather current JSON")?;

    let temperature_c = kelvin_to_celsius(parsed.main.and_then(|m| m.temp));

    let (description, icon) = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| (w.description, w.icon))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

    let observed_at =
        parsed.dt.and_then(|ts| DateTime::from_timestamp(ts, 0)).unwrap_or_else(Utc::now);

    Ok(WeatherSnapshot { temperature_c, icon, description, observed_at })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, at: Coordinates) -> Result<WeatherSnapshot> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        tracing::debug!(lat = at.latitude, lon = at.longitude, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", at.latitude.to_string()),
                ("lon", at.longitude.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(DirectoryError::HttpStatus {
                service: "OpenWeather",
                status,
                body: truncate_body(&body),
            }
            .into());
        }

        parse_current(&body)
    }
}
