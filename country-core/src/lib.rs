//! Core library for the `countries` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The remote country source (GraphQL)
//! - The derivation layer: search, continent/language filters, sorting
//! - On-demand weather for an expanded country
//!
//! It is used by `country-cli`, but can also be reused by other front ends.

pub mod config;
pub mod directory;
pub mod error;
pub mod model;
pub mod panel;
pub mod source;
pub mod weather;

#[cfg(test)]
mod testing;

pub use config::{Config, WeatherConfig};
pub use directory::{Directory, Filters, SortKey};
pub use error::DirectoryError;
pub use model::{Continent, Coordinates, Country, Language, WeatherSnapshot};
pub use panel::DetailPanel;
pub use source::{CountrySource, GraphqlCountrySource, load_directory};
pub use weather::{WeatherProvider, WeatherService, kelvin_to_celsius};
