use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::DirectoryError,
    model::{Coordinates, Country, WeatherSnapshot},
    weather::{coords::CoordinateTable, openweather::OpenWeatherProvider},
};

pub mod coords;
pub mod openweather;

const ABSOLUTE_ZERO_OFFSET: f64 = 273.15;

/// Whole degrees Celsius, rounded to nearest. Anything below zero, and a
/// missing or non-finite reading, is reported as 0.
pub fn kelvin_to_celsius(kelvin: Option<f64>) -> u32 {
    match kelvin {
        Some(k) if k.is_finite() => {
            let celsius = (k - ABSOLUTE_ZERO_OFFSET).round();
            if celsius <= 0.0 { 0 } else { celsius as u32 }
        }
        _ => 0,
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, at: Coordinates) -> Result<WeatherSnapshot>;
}

/// Coordinate lookup plus an optional provider; without an API key there is
/// no provider and every lookup fails with [`DirectoryError::MissingApiKey`].
#[derive(Debug)]
pub struct WeatherService {
    coords: CoordinateTable,
    provider: Option<Box<dyn WeatherProvider>>,
}

impl WeatherService {
    pub fn new(coords: CoordinateTable, provider: Option<Box<dyn WeatherProvider>>) -> Self {
        Self { coords, provider }
    }

    /// Build from config: embedded coordinates, OpenWeather if a key is available.
    pub fn from_config(config: &Config) -> Result<Self> {
        let coords = CoordinateTable::embedded()?;
        let provider = config
            .weather_api_key()
            .map(|key| {
                OpenWeatherProvider::new(key, config.weather_base_url(), config.request_timeout())
                    .map(|p| Box::new(p) as Box<dyn WeatherProvider>)
            })
            .transpose()?;

        if provider.is_none() {
            tracing::debug!("no weather API key, weather panels will stay empty");
        }

        Ok(Self::new(coords, provider))
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn current_for(&self, country: &Country) -> Result<WeatherSnapshot> {
        let at = self
            .coords
            .get(&country.code)
            .ok_or_else(|| DirectoryError::NoCoordinates(country.code.clone()))?;

        let provider = self.provider.as_ref().ok_or(DirectoryError::MissingApiKey)?;
        provider.current(at).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::testing::country;
    use chrono::Utc;

    #[derive(Debug)]
    pub(crate) struct FixedProvider(pub f64);

    #[async_trait]
    impl WeatherProvider for FixedProvider {
        async fn current(&self, _at: Coordinates) -> Result<WeatherSnapshot> {
            Ok(WeatherSnapshot {
                temperature_c: kelvin_to_celsius(Some(self.0)),
                icon: "01d".into(),
                description: "clear sky".into(),
                observed_at: Utc::now(),
            })
        }
    }

    #[derive(Debug)]
    pub(crate) struct FailingProvider;

    #[async_trait]
    impl WeatherProvider for FailingProvider {
        async fn current(&self, _at: Coordinates) -> Result<WeatherSnapshot> {
            Err(anyhow::anyhow!("OpenWeather request failed with status 401"))
        }
    }

    pub(crate) fn service(provider: Option<Box<dyn WeatherProvider>>) -> WeatherService {
        let coords = CoordinateTable::from_json(
            r#"{ "DE": { "latitude": 51.17, "longitude": 10.45 } }"#,
        )
        .expect("valid table");
        WeatherService::new(coords, provider)
    }

    #[test]
    fn kelvin_rounds_to_nearest() {
        assert_eq!(kelvin_to_celsius(Some(300.0)), 27);
        assert_eq!(kelvin_to_celsius(Some(273.15)), 0);
        assert_eq!(kelvin_to_celsius(Some(283.64)), 10);
        assert_eq!(kelvin_to_celsius(Some(283.66)), 11);
    }

    #[test]
    fn kelvin_floors_at_zero() {
        assert_eq!(kelvin_to_celsius(Some(250.0)), 0);
        assert_eq!(kelvin_to_celsius(Some(-5.0)), 0);
        assert_eq!(kelvin_to_celsius(None), 0);
        assert_eq!(kelvin_to_celsius(Some(f64::NAN)), 0);
    }

    #[tokio::test]
    async fn current_for_uses_coordinates_and_provider() {
        let svc = service(Some(Box::new(FixedProvider(300.0))));
        let snapshot = svc.current_for(&country("DE", "Germany", "Europe", &[])).await.unwrap();
        assert_eq!(snapshot.temperature_c, 27);
    }

    #[tokio::test]
    async fn unknown_code_has_no_coordinates() {
        let svc = service(Some(Box::new(FixedProvider(300.0))));
        let err = svc.current_for(&country("XX", "Nowhere", "Europe", &[])).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DirectoryError>(),
            Some(DirectoryError::NoCoordinates(code)) if code == "XX"
        ));
    }

    #[tokio::test]
    async fn missing_provider_reports_missing_key() {
        let svc = service(None);
        assert!(!svc.has_provider());

        let err = svc.current_for(&country("DE", "Germany", "Europe", &[])).await.unwrap_err();
        assert!(err.to_string().contains("No weather API key configured"));
    }
}
