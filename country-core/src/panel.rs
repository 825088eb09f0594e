use crate::{
    model::{Country, WeatherSnapshot},
    weather::WeatherService,
};

/// Expand/collapse state of one country's detail view.
///
/// Expanding fetches the weather once; collapsing throws it away. A fetch
/// failure is logged and leaves the panel open with no weather.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailPanel {
    expanded: bool,
    weather: Option<WeatherSnapshot>,
}

impl DetailPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    /// Flip the panel. Returns the new expanded state.
    pub async fn toggle(&mut self, country: &Country, weather: &WeatherService) -> bool {
        if self.expanded {
            self.collapse();
        } else {
            self.expand(country, weather).await;
        }
        self.expanded
    }

    pub async fn expand(&mut self, country: &Country, weather: &WeatherService) {
        self.expanded = true;
        self.weather = match weather.current_for(country).await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!(country = %country.code, error = %err, "weather unavailable");
                None
            }
        };
    }

    pub fn collapse(&mut self) {
        self.expanded = false;
        self.weather = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        testing::{country, serve_silence},
        weather::{
            openweather::OpenWeatherProvider,
            tests::{FailingProvider, FixedProvider, service},
        },
    };
    use std::time::Duration;

    #[tokio::test]
    async fn expand_fetches_and_collapse_discards() {
        let svc = service(Some(Box::new(FixedProvider(300.0))));
        let germany = country("DE", "Germany", "Europe", &["German"]);
        let mut panel = DetailPanel::new();

        assert!(panel.toggle(&germany, &svc).await);
        let weather = panel.weather().expect("weather fetched on expand");
        assert_eq!(weather.temperature_c, 27);
        assert_eq!(weather.description, "clear sky");

        assert!(!panel.toggle(&germany, &svc).await);
        assert_eq!(panel, DetailPanel::default());
    }

    #[tokio::test]
    async fn failed_fetch_leaves_panel_open_without_weather() {
        let svc = service(Some(Box::new(FailingProvider)));
        let germany = country("DE", "Germany", "Europe", &["German"]);
        let mut panel = DetailPanel::new();

        assert!(panel.toggle(&germany, &svc).await);
        assert!(panel.is_expanded());
        assert!(panel.weather().is_none());
    }

    #[tokio::test]
    async fn stalled_weather_host_leaves_panel_empty() {
        let base_url = serve_silence().await;
        let provider = OpenWeatherProvider::new("KEY".into(), base_url, Duration::from_millis(200))
            .expect("client builds");
        let svc = service(Some(Box::new(provider)));
        let mut panel = DetailPanel::new();

        assert!(panel.toggle(&country("DE", "Germany", "Europe", &[]), &svc).await);
        assert!(panel.weather().is_none());
    }

    #[tokio::test]
    async fn missing_coordinates_or_key_leave_panel_empty() {
        let mut panel = DetailPanel::new();

        let svc = service(Some(Box::new(FixedProvider(300.0))));
        panel.expand(&country("XX", "Nowhere", "Europe", &[]), &svc).await;
        assert!(panel.is_expanded() && panel.weather().is_none());

        let svc = service(None);
        panel.collapse();
        panel.expand(&country("DE", "Germany", "Europe", &[]), &svc).await;
        assert!(panel.is_expanded() && panel.weather().is_none());
    }

    #[tokio::test]
    async fn re_expanding_fetches_fresh_weather() {
        let germany = country("DE", "Germany", "Europe", &[]);
        let mut panel = DetailPanel::new();

        panel.expand(&germany, &service(Some(Box::new(FixedProvider(290.0))))).await;
        assert_eq!(panel.weather().map(|w| w.temperature_c), Some(17));

        panel.collapse();
        panel.expand(&germany, &service(Some(Box::new(FixedProvider(280.0))))).await;
        assert_eq!(panel.weather().map(|w| w.temperature_c), Some(7));
    }
}
