//! Display helpers — rounded readings with unit suffixes, and the one-line
//! text reply built from a card.

use super::WeatherCard;

/// Placeholder for readings the API did not return.
const MISSING: &str = "—";

fn rounded(value: Option<f64>) -> Option<i64> {
    value.filter(|v| v.is_finite()).map(|v| v.round() as i64)
}

pub fn as_deg(value: Option<f64>) -> String {
    rounded(value).map_or_else(|| MISSING.to_string(), |v| format!("{v}°"))
}

pub fn as_pct(value: Option<f64>) -> String {
    rounded(value).map_or_else(|| MISSING.to_string(), |v| format!("{v}%"))
}

pub fn as_speed(value: Option<f64>) -> String {
    rounded(value).map_or_else(|| MISSING.to_string(), |v| format!("{v} km/h"))
}

/// The chat reply line shown above the card.
pub fn reply_line(card: &WeatherCard) -> String {
    format!(
        "{} {}: {}. {} feels {}. H:{} / L:{}  •  Humidity {}  •  Wind {}.",
        card.icon,
        card.location,
        card.condition,
        as_deg(card.temperature),
        as_deg(card.feels_like),
        as_deg(card.high),
        as_deg(card.low),
        as_pct(card.humidity),
        as_speed(card.wind),
    )
}
