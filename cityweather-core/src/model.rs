use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// A geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    /// First-level administrative region, e.g. a state or county.
    pub admin1: Option<String>,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Current-conditions snapshot for a single point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Degrees Celsius.
    pub temperature: f64,
    /// km/h.
    pub windspeed: f64,
    pub weathercode: i32,
    /// Local observation time as reported, e.g. `2024-01-01T12:00`.
    pub time: String,
    pub timezone_abbreviation: Option<String>,
}

/// Display-ready result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedSummary {
    pub label: String,
    pub temperature_c: i64,
    pub description: String,
    pub windspeed_kmh: f64,
    pub observed_at: String,
}

/// What an output sink is asked to show while a submission progresses.
#[derive(Debug, Clone, Copy)]
pub enum LookupEvent<'a> {
    Loading { city: &'a str },
    Ready(&'a RenderedSummary),
    Failed(&'a LookupError),
}
