//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! when present, then applies `RELAY_BIND` and `RELAY_LOG_LEVEL` env
//! overrides. A missing file is not an error: the built-in defaults match
//! a stock local setup (Ollama on localhost, weather lookups enabled), so
//! the relay boots with zero configuration.

use std::{env, fs, path::Path};

use serde::Deserialize;

use crate::error::AppError;

/// OpenAI / OpenAI-compatible provider configuration.
/// Populated from `[llm.openai]` in the TOML.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (e.g. `"dummy"`, `"openai"`).
    /// Maps to `default` in `[llm]` TOML — named `default` there to signal
    /// that other provider sections can coexist without being loaded.
    pub provider: String,
    /// Config for the OpenAI / OpenAI-compatible provider (`[llm.openai]`).
    pub openai: OpenAiConfig,
}

/// Weather lookup configuration (`[weather]`).
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// When `false`, every message goes to the LLM regardless of intent.
    pub enabled: bool,
    /// Geocoding search endpoint.
    pub geocoding_url: String,
    /// Forecast endpoint.
    pub forecast_url: String,
    /// Per-request HTTP timeout in seconds (applies to both calls).
    pub timeout_seconds: u64,
}

/// Fully-resolved relay configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address the HTTP listener binds to.
    pub bind: String,
    pub log_level: String,
    pub llm: LlmConfig,
    /// API key from `LLM_API_KEY` env var — `None` for keyless local models.
    /// Never sourced from TOML.
    pub llm_api_key: Option<String>,
    pub weather: WeatherConfig,
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    relay: RawRelay,
    #[serde(default)]
    llm: RawLlm,
    #[serde(default)]
    weather: RawWeather,
}

#[derive(Deserialize)]
struct RawRelay {
    #[serde(default = "default_bind")]
    bind: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

impl Default for RawRelay {
    fn default() -> Self {
        Self { bind: default_bind(), log_level: default_log_level() }
    }
}

#[derive(Deserialize)]
struct RawLlm {
    /// Maps to `default = "..."` in `[llm]`.
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    openai: RawOpenAiConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_llm_provider(), openai: RawOpenAiConfig::default() }
    }
}

#[derive(Deserialize)]
struct RawOpenAiConfig {
    #[serde(default = "default_openai_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_openai_model")]
    model: String,
    #[serde(default = "default_openai_temperature")]
    temperature: f32,
    #[serde(default = "default_openai_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawOpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            temperature: default_openai_temperature(),
            timeout_seconds: default_openai_timeout_seconds(),
        }
    }
}

#[derive(Deserialize)]
struct RawWeather {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_geocoding_url")]
    geocoding_url: String,
    #[serde(default = "default_forecast_url")]
    forecast_url: String,
    #[serde(default = "default_weather_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawWeather {
    fn default() -> Self {
        Self {
            enabled: true,
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            timeout_seconds: default_weather_timeout_seconds(),
        }
    }
}

fn default_bind() -> String { "127.0.0.1:5000".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_llm_provider() -> String { "openai".to_string() }
fn default_openai_api_base_url() -> String { "http://localhost:11434/v1/chat/completions".to_string() }
fn default_openai_model() -> String { "gpt-oss:20b".to_string() }
fn default_openai_temperature() -> f32 { 0.7 }
fn default_openai_timeout_seconds() -> u64 { 60 }
fn default_geocoding_url() -> String { "https://geocoding-api.open-meteo.com/v1/search".to_string() }
fn default_forecast_url() -> String { "https://api.open-meteo.com/v1/forecast".to_string() }
fn default_weather_timeout_seconds() -> u64 { 10 }

fn default_true() -> bool { true }

/// Load config from `config/default.toml`, then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    let bind_override = env::var("RELAY_BIND").ok();
    let log_level_override = env::var("RELAY_LOG_LEVEL").ok();
    load_from(
        Path::new("config/default.toml"),
        bind_override.as_deref(),
        log_level_override.as_deref(),
    )
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    bind_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let parsed = if path.exists() {
        let raw = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str::<RawConfig>(&raw)
            .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?
    } else {
        RawConfig::default()
    };

    let bind = bind_override.unwrap_or(&parsed.relay.bind).to_string();
    let log_level = log_level_override.unwrap_or(&parsed.relay.log_level).to_string();

    Ok(Config {
        bind,
        log_level,
        llm: LlmConfig {
            provider: parsed.llm.provider,
            openai: OpenAiConfig {
                api_base_url: parsed.llm.openai.api_base_url,
                model: parsed.llm.openai.model,
                temperature: parsed.llm.openai.temperature,
                timeout_seconds: parsed.llm.openai.timeout_seconds,
            },
        },
        llm_api_key: env::var("LLM_API_KEY").ok(),
        weather: WeatherConfig {
            enabled: parsed.weather.enabled,
            geocoding_url: parsed.weather.geocoding_url,
            forecast_url: parsed.weather.forecast_url,
            timeout_seconds: parsed.weather.timeout_seconds,
        },
    })
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for unit tests — dummy LLM, no API keys, no external calls.
#[cfg(test)]
impl Config {
    pub fn test_default() -> Self {
        Self {
            bind: "127.0.0.1:0".into(),
            log_level: "info".into(),
            llm: LlmConfig {
                provider: "dummy".into(),
                openai: OpenAiConfig {
                    api_base_url: "http://localhost:0/v1/chat/completions".into(),
                    model: "test-model".into(),
                    temperature: 0.0,
                    timeout_seconds: 1,
                },
            },
            llm_api_key: None,
            weather: WeatherConfig {
                enabled: false,
                geocoding_url: "http://localhost:0/v1/search".into(),
                forecast_url: "http://localhost:0/v1/forecast".into(),
                timeout_seconds: 1,
            },
        }
    }
}
