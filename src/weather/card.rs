//! The structured UI payload returned next to the text reply.
//!
//! Field names are the wire contract with the browser frontend — camelCase,
//! with a literal `type` discriminator. Numeric fields carry the raw API
//! values; rounding happens only in the display layer.

use serde::Serialize;

use super::client::{Forecast, GeoMatch};
use super::codes;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherCard {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub location: String,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind: Option<f64>,
    pub condition: &'static str,
    pub icon: &'static str,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub uv: Option<f64>,
}

impl WeatherCard {
    /// Assemble a card from a geocoder match and its forecast.
    pub(super) fn build(place: &GeoMatch, forecast: &Forecast) -> Self {
        // "Name, Region" with the admin area preferred over the country code;
        // bare name when neither is known.
        let region = place
            .admin1
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| place.country_code.as_deref().filter(|s| !s.is_empty()));
        let location = match region {
            Some(region) => format!("{}, {}", place.name, region),
            None => place.name.clone(),
        };

        let code = forecast.current.weather_code.unwrap_or(0);

        Self {
            kind: "weather",
            location,
            temperature: forecast.current.temperature_2m,
            feels_like: forecast.current.apparent_temperature,
            humidity: forecast.current.relative_humidity_2m,
            wind: forecast.current.wind_speed_10m,
            condition: codes::label(code),
            icon: codes::icon(code),
            high: first(&forecast.daily.temperature_2m_max),
            low: first(&forecast.daily.temperature_2m_min),
            uv: first(&forecast.daily.uv_index_max),
        }
    }
}

/// Today's value from a daily series; `None` for empty or null-first series.
fn first(values: &[Option<f64>]) -> Option<f64> {
    values.first().copied().flatten()
}
