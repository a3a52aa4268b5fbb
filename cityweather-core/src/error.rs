use thiserror::Error;

/// Boxed cause carried by the fetch failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything a lookup can end with besides a summary.
///
/// The `Display` text is what the user sees; transport details stay in the
/// `source()` chain for logging.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Please enter a city name.")]
    EmptyInput,

    #[error("Failed to fetch location data.")]
    LocationFetchFailed(#[source] BoxError),

    #[error("City not found. Please check the spelling or try a nearby city.")]
    CityNotFound,

    #[error("Failed to fetch weather data.")]
    WeatherFetchFailed(#[source] BoxError),

    #[error("No current weather available for this location.")]
    NoCurrentWeather,
}

impl LookupError {
    pub(crate) fn location(err: anyhow::Error) -> Self {
        Self::LocationFetchFailed(err.into())
    }

    pub(crate) fn weather(err: anyhow::Error) -> Self {
        Self::WeatherFetchFailed(err.into())
    }

    /// Blank input is a hint rather than a failure.
    pub fn is_hint(&self) -> bool {
        matches!(self, Self::EmptyInput)
    }
}
