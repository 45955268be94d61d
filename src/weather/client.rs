//! Open-Meteo HTTP client — geocoding search plus current/daily forecast.
//!
//! Wire types are private to the weather module. Absent fields deserialize
//! to `None` / empty instead of failing the whole lookup; the display layer
//! renders the gaps.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::config::WeatherConfig;

use super::WeatherError;

/// `current=` query value — one round-trip for all card readings.
const CURRENT_FIELDS: &str =
    "temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,weather_code";
/// `daily=` query value — today's high/low/UV.
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,uv_index_max";

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| WeatherError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
        })
    }

    /// Resolve a city name to its best geocoder match.
    ///
    /// `Ok(None)` when the geocoder returns no results — the caller turns
    /// that into a "couldn't find weather" reply rather than an error.
    pub async fn geocode(&self, city: &str) -> Result<Option<GeoMatch>, WeatherError> {
        debug!(%city, "geocoding request");
        let response = self
            .client
            .get(&self.geocoding_url)
            .query(&[("name", city), ("count", "1")])
            .send()
            .await
            .map_err(|e| {
                error!(url = %self.geocoding_url, error = %e, "geocoding request failed (transport)");
                WeatherError::Request(format!("geocoding: {e}"))
            })?
            .error_for_status()
            .map_err(|e| WeatherError::Request(format!("geocoding: {e}")))?;

        let parsed = response.json::<GeocodingResponse>().await.map_err(|e| {
            error!(error = %e, "failed to deserialize geocoding response");
            WeatherError::Request(format!("geocoding: failed to parse response body: {e}"))
        })?;

        Ok(parsed.results.into_iter().next())
    }

    /// Fetch current conditions and today's daily aggregates for a point.
    pub async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Forecast, WeatherError> {
        debug!(latitude, longitude, "forecast request");
        let response = self
            .client
            .get(&self.forecast_url)
            .query(&[("latitude", latitude), ("longitude", longitude)])
            .query(&[
                ("current", CURRENT_FIELDS),
                ("daily", DAILY_FIELDS),
                ("timezone", "auto"),
            ])
            .send()
            .await
            .map_err(|e| {
                error!(url = %self.forecast_url, error = %e, "forecast request failed (transport)");
                WeatherError::Request(format!("forecast: {e}"))
            })?
            .error_for_status()
            .map_err(|e| WeatherError::Request(format!("forecast: {e}")))?;

        response.json::<Forecast>().await.map_err(|e| {
            error!(error = %e, "failed to deserialize forecast response");
            WeatherError::Request(format!("forecast: failed to parse response body: {e}"))
        })
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeoMatch>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoMatch {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub admin1: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub current: CurrentConditions,
    #[serde(default)]
    pub daily: DailyForecast,
}

#[derive(Debug, Default, Deserialize)]
pub struct CurrentConditions {
    pub temperature_2m: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub weather_code: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub uv_index_max: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocoding_response_takes_first_result() {
        let parsed: GeocodingResponse = serde_json::from_str(
            r#"{"results":[
                {"latitude":30.27,"longitude":-97.74,"name":"Austin","admin1":"Texas","country_code":"US"},
                {"latitude":14.7,"longitude":121.1,"name":"Austin"}
            ]}"#,
        )
        .unwrap();
        let first = parsed.results.into_iter().next().unwrap();
        assert_eq!(first.name, "Austin");
        assert_eq!(first.admin1.as_deref(), Some("Texas"));
    }

    #[test]
    fn geocoding_response_without_results_key() {
        let parsed: GeocodingResponse = serde_json::from_str(r#"{"generationtime_ms":0.5}"#).unwrap();
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn forecast_parses_partial_payload() {
        // No daily block, current missing half its readings.
        let parsed: Forecast = serde_json::from_str(
            r#"{"current":{"temperature_2m":18.2,"weather_code":61}}"#,
        )
        .unwrap();
        assert_eq!(parsed.current.temperature_2m, Some(18.2));
        assert_eq!(parsed.current.weather_code, Some(61));
        assert_eq!(parsed.current.wind_speed_10m, None);
        assert!(parsed.daily.temperature_2m_max.is_empty());
    }

    #[test]
    fn forecast_daily_nulls_survive() {
        let parsed: Forecast = serde_json::from_str(
            r#"{"daily":{"temperature_2m_max":[null,21.0],"uv_index_max":[3.5]}}"#,
        )
        .unwrap();
        assert_eq!(parsed.daily.temperature_2m_max, vec![None, Some(21.0)]);
        assert_eq!(parsed.daily.uv_index_max, vec![Some(3.5)]);
    }
}
