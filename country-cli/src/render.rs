use chrono::Local;
use std::fmt::Write;

use country_core::{Country, Directory, Filters, WeatherSnapshot};

const NONE: &str = "-";

/// Collapsed card: what the list shows for every country.
pub fn summary(country: &Country) -> String {
    format!(
        "{} ({})\n  Capital: {}\n  Continent: {}\n  Flag: {}",
        country.name,
        country.code,
        country.capital.as_deref().unwrap_or(NONE),
        country.continent_name(),
        country.flag_url(),
    )
}

/// Expanded card: summary plus languages, currency, native name, phone code
/// and the weather panel when one was fetched.
pub fn details(country: &Country, weather: Option<&WeatherSnapshot>) -> String {
    let mut out = summary(country);

    out.push_str("\n  Languages:");
    if country.languages.is_empty() {
        let _ = write!(out, " {NONE}");
    }
    for name in country.language_names() {
        let _ = write!(out, "\n    - {name}");
    }

    let _ = write!(
        out,
        "\n  Currency: {}\n  Native: {}\n  Phone Code: +{}",
        country.currency.as_deref().unwrap_or(NONE),
        country.native,
        country.phone,
    );

    if let Some(snapshot) = weather {
        out.push('\n');
        out.push_str(&weather_panel(snapshot));
    }

    out
}

pub fn weather_panel(snapshot: &WeatherSnapshot) -> String {
    let mut out = format!(
        "  Weather: {}°C, {}\n  Observed: {}",
        snapshot.temperature_c,
        snapshot.description,
        snapshot.observed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
    );
    if let Some(url) = snapshot.icon_url() {
        let _ = write!(out, "\n  Icon: {url}");
    }
    out
}

pub fn filters_line(filters: &Filters) -> String {
    if filters.is_default() {
        return "No filters".to_string();
    }

    let mut parts = Vec::new();
    if !filters.search.is_empty() {
        parts.push(format!("search \"{}\"", filters.search));
    }
    if let Some(continent) = &filters.continent {
        parts.push(format!("continent {continent}"));
    }
    if let Some(language) = &filters.language {
        parts.push(format!("language {language}"));
    }
    if let Some(sort) = filters.sort {
        parts.push(format!("sorted by {}", sort.label().to_lowercase()));
    }
    parts.join(", ")
}

/// The whole derived view, one summary card per country.
pub fn list(directory: &Directory) -> String {
    let mut out = String::new();
    for country in directory.visible() {
        out.push_str(&summary(country));
        out.push_str("\n\n");
    }
    let _ = write!(
        out,
        "{} of {} countries ({})",
        directory.visible_len(),
        directory.source().len(),
        filters_line(directory.filters()),
    );
    out
}

pub fn names(title: &str, names: &[String]) -> String {
    let mut out = format!("{title} ({})", names.len());
    for name in names {
        let _ = write!(out, "\n  {name}");
    }
    out
}
