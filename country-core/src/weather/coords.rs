use anyhow::{Context, Result};
use std::collections::HashMap;

use crate::model::Coordinates;

const EMBEDDED: &str = include_str!("../../data/country_coords.json");

/// ISO alpha-2 code → approximate geographic centre.
#[derive(Debug, Clone, Default)]
pub struct CoordinateTable {
    entries: HashMap<String, Coordinates>,
}

impl CoordinateTable {
    /// The table shipped with the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED).context("Failed to parse embedded coordinate table")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, Coordinates> = serde_json::from_str(json)?;
        let entries = raw.into_iter().map(|(code, c)| (code.to_uppercase(), c)).collect();
        Ok(Self { entries })
    }

    pub fn get(&self, code: &str) -> Option<Coordinates> {
        self.entries.get(&code.to_uppercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
