//! Breeze — weather-aware chat relay entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger
//!   4. Build shared state (LLM provider, weather service)
//!   5. Spawn Ctrl-C → shutdown signal watcher
//!   6. Serve HTTP until shutdown

use tokio_util::sync::CancellationToken;
use tracing::info;

use breeze::config;
use breeze::error::AppError;
use breeze::llm::providers;
use breeze::logger;
use breeze::server::{self, AppState};
use breeze::weather::WeatherService;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::init(&config.log_level)?;

    info!(
        bind = %config.bind,
        provider = %config.llm.provider,
        model = %config.llm.openai.model,
        weather_enabled = config.weather.enabled,
        "config loaded"
    );

    let llm = providers::build(&config.llm, config.llm_api_key.clone())
        .map_err(|e| AppError::Config(e.to_string()))?;

    let weather = if config.weather.enabled {
        Some(WeatherService::new(&config.weather).map_err(|e| AppError::Config(e.to_string()))?)
    } else {
        None
    };

    let state = AppState {
        llm,
        weather,
        model: config.llm.openai.model.clone(),
        llm_url: config.llm.openai.api_base_url.clone(),
    };

    // Shared shutdown token — Ctrl-C cancels it, the server watches it.
    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received — initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    server::run(&config.bind, state, shutdown).await
}
