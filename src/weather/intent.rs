//! Weather-intent detection.
//!
//! A message is a weather request when it contains the word "weather"
//! followed (anywhere later in the same line) by "in", "at" or "for" and a
//! city-looking string. Everything else falls through to the LLM.

use std::sync::OnceLock;

use regex::Regex;

static CITY_RE: OnceLock<Regex> = OnceLock::new();

fn city_re() -> &'static Regex {
    // `.` does not cross newlines, matching one request line at a time.
    CITY_RE.get_or_init(|| {
        Regex::new(r"(?i)\bweather\b.*?\b(?:in|at|for)\b\s+([A-Za-z .,'-]+)").unwrap()
    })
}

/// Extract a probable city name from prompts like:
///   - "weather in Austin"
///   - "what's the weather at Paris, FR?"
///
/// Returns the trimmed capture, or `None` when the message is not a weather
/// request.
pub fn find_weather_city(text: &str) -> Option<&str> {
    city_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|city| !city.is_empty())
}
