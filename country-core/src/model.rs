use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continent {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
}

/// A country as returned by the GraphQL endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    #[serde(default)]
    pub capital: Option<String>,
    pub continent: Continent,
    pub code: String,
    #[serde(default)]
    pub languages: Vec<Language>,
    /// Comma separated currency codes, e.g. "EUR" or "USD,USN,USS".
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub native: String,
    #[serde(default)]
    pub phone: String,
}

impl Country {
    pub fn continent_name(&self) -> &str {
        &self.continent.name
    }

    pub fn language_names(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|l| l.name.as_str())
    }

    pub fn speaks(&self, language: &str) -> bool {
        self.language_names().any(|name| same_name(name, language))
    }

    pub fn flag_url(&self) -> String {
        format!("https://flagcdn.com/w320/{}.png", self.code.to_lowercase())
    }
}

/// Name equality used by every filter and lookup: Unicode lowercase on both sides.
pub fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions for one country, already converted to whole degrees Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: u32,
    pub icon: String,
    pub description: String,
    pub observed_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    pub fn icon_url(&self) -> Option<String> {
        if self.icon.is_empty() {
            None
        } else {
            Some(format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon))
        }
    }
}
