use crate::model::{CurrentWeather, Place};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

pub use open_meteo::{OpenMeteoForecast, OpenMeteoGeocoder};

/// Resolves a free-text place name to candidate coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Candidates in the provider's own ranking; empty when nothing matched.
    async fn search(&self, name: &str) -> anyhow::Result<Vec<Place>>;
}

/// Current conditions for a coordinate pair.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// `Ok(None)` when the provider answered but had no current conditions.
    async fn current(&self, latitude: f64, longitude: f64)
    -> anyhow::Result<Option<CurrentWeather>>;
}
