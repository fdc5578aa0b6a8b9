/// Application configuration module
use crate::services::{DEFAULT_DISPLAY_CAP, DEFAULT_MARGIN_HOURS};
use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub spacex_api_url: String,
    pub bind_addr: String,
    pub next_launch_margin_hours: i64,
    pub history_display_cap: usize,
    pub next_launch_refresh_seconds: u64,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let spacex_api_url = env::var("SPACEX_API_URL")
            .unwrap_or_else(|_| "https://api.spacexdata.com/v5".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let config = Self {
            spacex_api_url,
            bind_addr,
            next_launch_margin_hours: env_parse("NEXT_LAUNCH_MARGIN_HOURS", DEFAULT_MARGIN_HOURS),
            history_display_cap: env_parse("HISTORY_DISPLAY_CAP", DEFAULT_DISPLAY_CAP),
            next_launch_refresh_seconds: env_parse("NEXT_LAUNCH_EVERY_SECONDS", 3600),
        };

        validate_margin_hours(config.next_launch_margin_hours)?;

        Ok(config)
    }

    /// Safety margin added to "now" when picking the next launch
    pub fn next_launch_margin(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.next_launch_margin_hours)
            .filter(|_| (0..=MAX_MARGIN_HOURS).contains(&self.next_launch_margin_hours))
            .unwrap_or_else(|| chrono::Duration::hours(DEFAULT_MARGIN_HOURS))
    }
}

/// Upper bound for the selection margin: one year
const MAX_MARGIN_HOURS: i64 = 24 * 366;

fn validate_margin_hours(hours: i64) -> anyhow::Result<()> {
    if !(0..=MAX_MARGIN_HOURS).contains(&hours) {
        anyhow::bail!(
            "NEXT_LAUNCH_MARGIN_HOURS must be between 0 and {}, got {}",
            MAX_MARGIN_HOURS,
            hours
        );
    }
    Ok(())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
