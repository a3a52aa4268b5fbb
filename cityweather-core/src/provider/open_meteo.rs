use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::model::{CurrentWeather, Place};

use super::{Geocoder, WeatherSource};

const USER_AGENT: &str = concat!("cityweather/", env!("CARGO_PKG_VERSION"));

/// How many candidates the geocoder is asked for; only the first is used.
const SEARCH_COUNT: &str = "5";
const SEARCH_LANGUAGE: &str = "en";

/// Shared HTTP client for both endpoints.
pub fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    base_url: String,
    http: Client,
}

impl OpenMeteoGeocoder {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http }
    }
}

#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    base_url: String,
    http: Client,
}

impl OpenMeteoForecast {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http }
    }
}

#[derive(Debug, Deserialize)]
struct OmSearchResponse {
    // Absent entirely when nothing matched.
    #[serde(default)]
    results: Vec<OmPlace>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    name: String,
    country: Option<String>,
    admin1: Option<String>,
}

impl From<OmPlace> for Place {
    fn from(p: OmPlace) -> Self {
        Place {
            name: p.name,
            admin1: p.admin1,
            country: p.country,
            latitude: p.latitude,
            longitude: p.longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current_weather: Option<OmCurrentWeather>,
    timezone_abbreviation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    windspeed: f64,
    weathercode: i32,
    time: String,
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn search(&self, name: &str) -> Result<Vec<Place>> {
        let url = endpoint(&self.base_url, "/v1/search");
        tracing::debug!(%url, name, "geocoding");

        let parsed: OmSearchResponse = get_json(
            &self.http,
            &url,
            &[
                ("name", name),
                ("count", SEARCH_COUNT),
                ("language", SEARCH_LANGUAGE),
                ("format", "json"),
            ],
            "geocoding",
        )
        .await?;

        tracing::debug!(matches = parsed.results.len(), "geocoding finished");
        Ok(parsed.results.into_iter().map(Place::from).collect())
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoForecast {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<Option<CurrentWeather>> {
        let url = endpoint(&self.base_url, "/v1/forecast");
        let latitude = latitude.to_string();
        let longitude = longitude.to_string();
        tracing::debug!(%url, %latitude, %longitude, "fetching current weather");

        let parsed: OmForecastResponse = get_json(
            &self.http,
            &url,
            &[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current_weather", "true"),
                ("temperature_unit", "celsius"),
                ("timezone", "auto"),
            ],
            "forecast",
        )
        .await?;

        let timezone_abbreviation = parsed.timezone_abbreviation;
        Ok(parsed.current_weather.map(|cw| CurrentWeather {
            temperature: cw.temperature,
            windspeed: cw.windspeed,
            weathercode: cw.weathercode,
            time: cw.time,
            timezone_abbreviation,
        }))
    }
}

async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    query: &[(&str, &str)],
    what: &str,
) -> Result<T> {
    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .with_context(|| format!("Failed to send request to Open-Meteo ({what})"))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read Open-Meteo {what} response body"))?;

    if !status.is_success() {
        return Err(anyhow!(
            "Open-Meteo {} request failed with status {}: {}",
            what,
            status,
            truncate_body(&body),
        ));
    }

    serde_json::from_str(&body).with_context(|| format!("Failed to parse Open-Meteo {what} JSON"))
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
