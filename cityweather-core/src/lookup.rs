use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    config::Config,
    error::LookupError,
    model::{LookupEvent, RenderedSummary},
    provider::{
        Geocoder, OpenMeteoForecast, OpenMeteoGeocoder, WeatherSource, open_meteo::http_client,
    },
    render,
};

/// Where a submission's progress is shown.
pub trait OutputSink: Send + Sync {
    fn show(&self, event: LookupEvent<'_>);
}

/// Geocode a city, fetch its current weather, and summarize it.
#[derive(Debug)]
pub struct WeatherLookup {
    geocoder: Box<dyn Geocoder>,
    weather: Box<dyn WeatherSource>,
    latest: AtomicU64,
}

impl WeatherLookup {
    pub fn new(geocoder: Box<dyn Geocoder>, weather: Box<dyn WeatherSource>) -> Self {
        Self {
            geocoder,
            weather,
            latest: AtomicU64::new(0),
        }
    }

    /// Open-Meteo for both calls, sharing one HTTP client.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;
        let http = http_client(config.timeout())?;

        Ok(Self::new(
            Box::new(OpenMeteoGeocoder::new(http.clone(), &config.geocode_base_url)),
            Box::new(OpenMeteoForecast::new(http, &config.forecast_base_url)),
        ))
    }

    pub async fn lookup(&self, city: &str) -> Result<RenderedSummary, LookupError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(LookupError::EmptyInput);
        }

        let place = self
            .geocoder
            .search(city)
            .await
            .map_err(LookupError::location)?
            .into_iter()
            .next()
            .ok_or(LookupError::CityNotFound)?;

        let current = self
            .weather
            .current(place.latitude, place.longitude)
            .await
            .map_err(LookupError::weather)?
            .ok_or(LookupError::NoCurrentWeather)?;

        let summary = render::summarize(&place, &current);
        tracing::info!(city, label = %summary.label, "lookup finished");
        Ok(summary)
    }

    /// Run a lookup on behalf of a form submission and report it to `sink`.
    ///
    /// Only the most recent submission may write its result; an older one
    /// that finishes late is dropped. Returns whether the result was shown.
    pub async fn submit(&self, city: &str, sink: &dyn OutputSink) -> bool {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let trimmed = city.trim();
        if trimmed.is_empty() {
            sink.show(LookupEvent::Failed(&LookupError::EmptyInput));
            return true;
        }

        sink.show(LookupEvent::Loading { city: trimmed });
        let outcome = self.lookup(trimmed).await;

        if self.latest.load(Ordering::SeqCst) != ticket {
            tracing::debug!(city = trimmed, ticket, "discarding superseded result");
            return false;
        }

        match &outcome {
            Ok(summary) => sink.show(LookupEvent::Ready(summary)),
            Err(err) => {
                if let Some(cause) = std::error::Error::source(err) {
                    tracing::warn!(city = trimmed, error = %cause, "{err}");
                }
                sink.show(LookupEvent::Failed(err));
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentWeather, Place};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex, atomic::AtomicUsize};

    #[derive(Debug, Default)]
    struct FakeGeocoder {
        places: Vec<Place>,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn search(&self, _name: &str) -> anyhow::Result<Vec<Place>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("status 503");
            }
            Ok(self.places.clone())
        }
    }

    #[derive(Debug, Default)]
    struct FakeWeather {
        current: Option<CurrentWeather>,
        fail: bool,
    }

    #[async_trait]
    impl WeatherSource for FakeWeather {
        async fn current(&self, _lat: f64, _lon: f64) -> anyhow::Result<Option<CurrentWeather>> {
            if self.fail {
                anyhow::bail!("timed out");
            }
            Ok(self.current.clone())
        }
    }

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<String>>);

    impl OutputSink for RecordingSink {
        fn show(&self, event: LookupEvent<'_>) {
            let line = match event {
                LookupEvent::Loading { city } => format!("loading {city}"),
                LookupEvent::Ready(summary) => format!("ready {}", summary.label),
                LookupEvent::Failed(err) => format!("failed {err}"),
            };
            self.0.lock().unwrap().push(line);
        }
    }

    fn paris() -> Place {
        Place {
            name: "Paris".into(),
            admin1: Some("Île-de-France".into()),
            country: Some("France".into()),
            latitude: 48.85,
            longitude: 2.35,
        }
    }

    fn clear() -> CurrentWeather {
        CurrentWeather {
            temperature: 21.6,
            windspeed: 7.2,
            weathercode: 0,
            time: "2024-06-01T14:00".into(),
            timezone_abbreviation: Some("CEST".into()),
        }
    }

    fn handler(geocoder: FakeGeocoder, weather: FakeWeather) -> WeatherLookup {
        WeatherLookup::new(Box::new(geocoder), Box::new(weather))
    }

    #[tokio::test]
    async fn blank_input_makes_no_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lookup = handler(
            FakeGeocoder { places: vec![paris()], calls: calls.clone(), ..Default::default() },
            FakeWeather { current: Some(clear()), ..Default::default() },
        );

        for input in ["", "   ", "\t\n"] {
            let err = lookup.lookup(input).await.unwrap_err();
            assert!(matches!(err, LookupError::EmptyInput));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn success_uses_first_candidate() {
        let second = Place { name: "Paris".into(), country: Some("United States".into()), ..paris() };
        let lookup = handler(
            FakeGeocoder { places: vec![paris(), second], ..Default::default() },
            FakeWeather { current: Some(clear()), ..Default::default() },
        );

        let summary = lookup.lookup("  Paris ").await.unwrap();
        assert_eq!(summary.label, "Paris, Île-de-France, France");
        assert_eq!(summary.temperature_c, 22);
        assert_eq!(summary.description, "Clear sky");
        assert_eq!(summary.observed_at, "6/1/2024, 2:00:00 PM CEST");
    }

    #[tokio::test]
    async fn maps_each_failure() {
        let lookup = handler(
            FakeGeocoder { fail: true, ..Default::default() },
            FakeWeather::default(),
        );
        assert!(matches!(lookup.lookup("x").await, Err(LookupError::LocationFetchFailed(_))));

        let lookup = handler(FakeGeocoder::default(), FakeWeather::default());
        assert!(matches!(lookup.lookup("x").await, Err(LookupError::CityNotFound)));

        let lookup = handler(
            FakeGeocoder { places: vec![paris()], ..Default::default() },
            FakeWeather { fail: true, ..Default::default() },
        );
        assert!(matches!(lookup.lookup("x").await, Err(LookupError::WeatherFetchFailed(_))));

        let lookup = handler(
            FakeGeocoder { places: vec![paris()], ..Default::default() },
            FakeWeather::default(),
        );
        assert!(matches!(lookup.lookup("x").await, Err(LookupError::NoCurrentWeather)));
    }

    #[tokio::test]
    async fn submit_reports_loading_then_result() {
        let lookup = handler(
            FakeGeocoder { places: vec![paris()], ..Default::default() },
            FakeWeather { current: Some(clear()), ..Default::default() },
        );
        let sink = RecordingSink::default();

        assert!(lookup.submit(" Paris ", &sink).await);
        assert_eq!(
            *sink.0.lock().unwrap(),
            vec!["loading Paris", "ready Paris, Île-de-France, France"]
        );
    }

    #[tokio::test]
    async fn submit_blank_shows_hint_only() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lookup = handler(
            FakeGeocoder { calls: calls.clone(), ..Default::default() },
            FakeWeather::default(),
        );
        let sink = RecordingSink::default();

        assert!(lookup.submit("  ", &sink).await);
        assert_eq!(*sink.0.lock().unwrap(), vec!["failed Please enter a city name."]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn submit_reports_errors() {
        let lookup = handler(FakeGeocoder::default(), FakeWeather::default());
        let sink = RecordingSink::default();

        assert!(lookup.submit("Atlantis", &sink).await);
        assert_eq!(
            *sink.0.lock().unwrap(),
            vec![
                "loading Atlantis",
                "failed City not found. Please check the spelling or try a nearby city."
            ]
        );
    }
}
