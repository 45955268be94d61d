//! Weather lookup — geocode a city, fetch current and daily conditions,
//! build the reply card.
//!
//! `WeatherService` is a shared immutable capability like the LLM providers:
//! constructed once at startup, cheaply cloned into request handlers.

mod card;
mod client;
mod codes;
mod format;
pub mod intent;

pub use card::WeatherCard;
pub use format::reply_line;

use thiserror::Error;
use tracing::debug;

use crate::config::WeatherConfig;
use client::OpenMeteoClient;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Request(String),
}

// ── Service ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct WeatherService {
    client: OpenMeteoClient,
}

impl WeatherService {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Ok(Self { client: OpenMeteoClient::new(config)? })
    }

    /// Full lookup: city → coordinates → conditions → card.
    ///
    /// `Ok(None)` means the geocoder had no match for `city` — a user-visible
    /// "not found", not an error.
    pub async fn lookup(&self, city: &str) -> Result<Option<WeatherCard>, WeatherError> {
        let Some(place) = self.client.geocode(city).await? else {
            debug!(%city, "geocoder found no match");
            return Ok(None);
        };

        let forecast = self.client.forecast(place.latitude, place.longitude).await?;
        Ok(Some(WeatherCard::build(&place, &forecast)))
    }
}
