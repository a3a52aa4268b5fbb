//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Geocoding and current-weather providers (Open-Meteo)
//! - The lookup itself: city name in, display-ready summary or user-facing error out
//! - HTML and plain-text rendering
//!
//! It is used by `cityweather-cli`, but the lookup has no UI dependencies and
//! can be driven by any front end through [`OutputSink`].

pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod render;
pub mod weather_code;

pub use config::Config;
pub use error::LookupError;
pub use lookup::{OutputSink, WeatherLookup};
pub use model::{CurrentWeather, LookupEvent, Place, RenderedSummary};
pub use provider::{Geocoder, WeatherSource};
