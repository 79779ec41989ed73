//! Language reference data

use serde::{Deserialize, Serialize};

/// Descriptive record for a language code.
///
/// `coordinates` is `[latitude, longitude]`. It is kept as a plain list so
/// that incomplete records still decode; consumers treat anything shorter
/// than two components as "no coordinate".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub coordinates: Vec<f64>,
    #[serde(default)]
    pub flag: String,
    #[serde(default)]
    pub country: String,
}

impl LanguageInfo {
    pub fn new(code: impl Into<String>, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            coordinates: vec![latitude, longitude],
            flag: String::new(),
            country: String::new(),
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = flag.into();
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Base coordinate as `(latitude, longitude)`, if the record has one
    pub fn base_coordinate(&self) -> Option<(f64, f64)> {
        match self.coordinates.as_slice() {
            [lat, lng, ..] => Some((*lat, *lng)),
            _ => None,
        }
    }
}
