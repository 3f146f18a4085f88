use std::time::Duration;

use anyhow::{Context, Result};

use crate::progress::ProgressConfig;

pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub service_url: String,
    pub progress_duration_ms: u64,
    pub progress_tick_ms: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Config {
            service_url: lookup("MATCHER_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string()),
            progress_duration_ms: parse_ms(&lookup, "PROGRESS_DURATION_MS", 30_000)?,
            progress_tick_ms: parse_ms(&lookup, "PROGRESS_TICK_MS", 400)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        };
        config.progress()?;
        Ok(config)
    }

    pub fn progress(&self) -> Result<ProgressConfig> {
        ProgressConfig::new(
            Duration::from_millis(self.progress_duration_ms),
            Duration::from_millis(self.progress_tick_ms),
        )
        .context("PROGRESS_TICK_MS must be greater than zero")
    }
}

fn parse_ms(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of milliseconds")),
        None => Ok(default),
    }
}
