//! WMO weather-code tables — code → human label and code → emoji.
//!
//! Covers the codes Open-Meteo actually emits; anything else renders as
//! "Unknown" / 🌡️.

pub fn label(code: u32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Drizzle",
        55 => "Dense drizzle",
        61 => "Light rain",
        63 => "Rain",
        65 => "Heavy rain",
        71 => "Light snow",
        73 => "Snow",
        75 => "Heavy snow",
        80 => "Rain showers",
        81 => "Heavy showers",
        82 => "Violent showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm w/ hail",
        99 => "Thunderstorm w/ heavy hail",
        _ => "Unknown",
    }
}

pub fn icon(code: u32) -> &'static str {
    match code {
        0 => "☀️",
        1 => "🌤️",
        2 => "⛅",
        3 => "☁️",
        45 | 48 => "🌫️",
        51 | 53 | 61 | 80 => "🌦️",
        55 | 63 | 65 | 81 => "🌧️",
        71 => "🌨️",
        73 | 75 => "❄️",
        82 | 95 | 96 | 99 => "⛈️",
        _ => "🌡️",
    }
}
