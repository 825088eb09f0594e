//! Derivation layer: turns the fetched country list plus the current filters
//! into the list that gets displayed.
//!
//! Every function here is pure. [`Directory`] only caches the result of
//! [`derive_view`] and recomputes it whenever a control changes.

use std::{cmp::Ordering, convert::TryFrom, fmt, str::FromStr};

use crate::{
    error::DirectoryError,
    model::{Country, same_name},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Continent,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Continent => "continent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Continent => "Continent",
        }
    }

    pub const fn all() -> &'static [SortKey] {
        &[SortKey::Name, SortKey::Continent]
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for SortKey {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "continent" => Ok(SortKey::Continent),
            _ => Err(anyhow::anyhow!(
                "Unknown sort key '{value}'. Supported keys: name, continent."
            )),
        }
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::try_from(s)
    }
}

/// The four user controls. `Default` is the state after "Clear".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub search: String,
    pub continent: Option<String>,
    pub language: Option<String>,
    /// `None` keeps the order the source returned.
    pub sort: Option<SortKey>,
}

impl Filters {
    pub fn is_default(&self) -> bool {
        *self == Filters::default()
    }
}

/// Distinct continent names, in the order they first appear.
pub fn unique_continents(source: &[Country]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for country in source {
        let name = country.continent_name();
        if !name.is_empty() && !seen.iter().any(|s| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

/// Distinct language names, in the order they first appear.
pub fn unique_languages(source: &[Country]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for name in source.iter().flat_map(|c| c.language_names()) {
        if !seen.iter().any(|s| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

/// True when the country satisfies every active predicate.
pub fn matches(country: &Country, filters: &Filters) -> bool {
    let search = filters.search.trim();
    if !search.is_empty() && !country.name.to_lowercase().contains(&search.to_lowercase()) {
        return false;
    }

    if let Some(continent) = &filters.continent {
        if !same_name(country.continent_name(), continent) {
            return false;
        }
    }

    if let Some(language) = &filters.language {
        if !country.speaks(language) {
            return false;
        }
    }

    true
}

fn compare_names(a: &Country, b: &Country) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

pub fn compare(a: &Country, b: &Country, sort: SortKey) -> Ordering {
    match sort {
        SortKey::Name => compare_names(a, b),
        SortKey::Continent => a
            .continent_name()
            .to_lowercase()
            .cmp(&b.continent_name().to_lowercase())
            .then_with(|| compare_names(a, b)),
    }
}

/// Indices into `source` of the countries to display, in display order.
pub fn derive_view(source: &[Country], filters: &Filters) -> Vec<usize> {
    let mut view: Vec<usize> = source
        .iter()
        .enumerate()
        .filter(|(_, country)| matches(country, filters))
        .map(|(idx, _)| idx)
        .collect();

    if let Some(sort) = filters.sort {
        view.sort_by(|&a, &b| compare(&source[a], &source[b], sort));
    }

    view
}

/// Source list, current filters and the view derived from them.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    source: Vec<Country>,
    continents: Vec<String>,
    languages: Vec<String>,
    filters: Filters,
    view: Vec<usize>,
}

impl Directory {
    pub fn new(source: Vec<Country>) -> Self {
        Self::with_filters(source, Filters::default())
    }

    pub fn with_filters(source: Vec<Country>, mut filters: Filters) -> Self {
        filters.search = filters.search.trim().to_string();
        let continents = unique_continents(&source);
        let languages = unique_languages(&source);
        let mut directory = Self { source, continents, languages, filters, view: Vec::new() };
        directory.recompute();
        directory
    }

    fn recompute(&mut self) {
        self.view = derive_view(&self.source, &self.filters);
        tracing::debug!(
            visible = self.view.len(),
            total = self.source.len(),
            filters = ?self.filters,
            "recomputed view"
        );
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn source(&self) -> &[Country] {
        &self.source
    }

    pub fn continents(&self) -> &[String] {
        &self.continents
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn visible(&self) -> impl Iterator<Item = &Country> + '_ {
        self.view.iter().map(|&idx| &self.source[idx])
    }

    pub fn visible_len(&self) -> usize {
        self.view.len()
    }

    /// Surrounding whitespace is dropped, so a blank search is no search.
    pub fn set_search(&mut self, search: impl AsRef<str>) {
        self.filters.search = search.as_ref().trim().to_string();
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: Option<SortKey>) {
        self.filters.sort = sort;
        self.recompute();
    }

    pub fn set_continent(&mut self, continent: Option<String>) {
        self.filters.continent = continent;
        self.recompute();
    }

    pub fn set_language(&mut self, language: Option<String>) {
        self.filters.language = language;
        self.recompute();
    }

    /// Reset every control; the view becomes the full source list again.
    pub fn clear(&mut self) {
        self.filters = Filters::default();
        self.recompute();
    }

    /// Find a country by ISO code first, then by exact name (case-insensitive).
    pub fn find(&self, query: &str) -> Result<&Country, DirectoryError> {
        let query = query.trim();
        self.source
            .iter()
            .find(|c| same_name(&c.code, query))
            .or_else(|| self.source.iter().find(|c| same_name(&c.name, query)))
            .ok_or_else(|| DirectoryError::UnknownCountry(query.to_string()))
    }
}
