//! Turning lookup results into display text.
//!
//! HTML output is a fragment meant to be dropped into a result region; every
//! value from the user or the APIs passes through [`escape_html`] first.

use chrono::{DateTime, NaiveDateTime};

use crate::{
    error::LookupError,
    model::{CurrentWeather, Place, RenderedSummary},
    weather_code,
};

const TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];
const DISPLAY_TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Escape `&`, `<`, `>` and `"` so the value can't inject markup.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `name, region, country`, leaving out blank parts.
pub fn place_label(place: &Place) -> String {
    [
        Some(place.name.as_str()),
        place.admin1.as_deref(),
        place.country.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ")
}

/// Round to the nearest degree; halves go up (-2.5 becomes -2).
pub fn round_temperature(celsius: f64) -> i64 {
    (celsius + 0.5).floor() as i64
}

/// Format the reported observation time for people, e.g. `1/1/2024, 12:00:00 PM GMT`.
///
/// Falls back to the raw value when it isn't a timestamp we recognize.
pub fn format_observation_time(raw: &str, timezone_abbreviation: Option<&str>) -> String {
    let parsed = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        });

    let Some(local) = parsed else {
        return raw.to_string();
    };

    let formatted = local.format(DISPLAY_TIME_FORMAT).to_string();
    match timezone_abbreviation.map(str::trim).filter(|tz| !tz.is_empty()) {
        Some(tz) => format!("{formatted} {tz}"),
        None => formatted,
    }
}

/// Build the summary for a place and its current conditions.
pub fn summarize(place: &Place, current: &CurrentWeather) -> RenderedSummary {
    RenderedSummary {
        label: place_label(place),
        temperature_c: round_temperature(current.temperature),
        description: weather_code::describe(current.weathercode).to_string(),
        windspeed_kmh: current.windspeed,
        observed_at: format_observation_time(
            &current.time,
            current.timezone_abbreviation.as_deref(),
        ),
    }
}

impl RenderedSummary {
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"city\">{}</div>\n\
             <div class=\"temp\">{}°C</div>\n\
             <div class=\"desc\">{}</div>\n\
             <div class=\"meta\">Wind: {} km/h • Last update: {}</div>",
            escape_html(&self.label),
            escape_html(&self.temperature_c.to_string()),
            escape_html(&self.description),
            escape_html(&self.windspeed_kmh.to_string()),
            escape_html(&self.observed_at),
        )
    }

    pub fn to_text(&self) -> String {
        format!(
            "{}\n{}°C  {}\nWind: {} km/h • Last update: {}",
            self.label, self.temperature_c, self.description, self.windspeed_kmh, self.observed_at,
        )
    }
}

pub fn loading_html() -> &'static str {
    "<p class=\"hint\">Looking up location and weather…</p>"
}

pub fn error_html(err: &LookupError) -> String {
    let class = if err.is_hint() { "hint" } else { "hint error" };
    format!("<p class=\"{class}\">{}</p>", escape_html(&err.to_string()))
}
