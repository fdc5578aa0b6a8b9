/// Launch tracker service entry point
mod clients;
mod config;
mod countdown;
mod domain;
mod errors;
mod handlers;
mod routes;
mod services;
mod utils;

use crate::clients::SpaceXClient;
use crate::config::AppConfig;
use crate::countdown::{CountdownState, SystemClock};
use crate::handlers::AppState;
use crate::routes::build_router;
use crate::services::{HeroPanel, LaunchProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    // Initialize provider and panels
    let client = SpaceXClient::new(config.spacex_api_url.clone())?;
    let provider = Arc::new(LaunchProvider::new(client));
    let hero = Arc::new(HeroPanel::new(
        provider.clone(),
        Arc::new(SystemClock),
        config.next_launch_margin(),
    ));

    let state = AppState {
        provider,
        hero: hero.clone(),
        history_display_cap: config.history_display_cap,
    };

    // Start background tasks
    start_background_tasks(&config, hero).await;

    // Build router
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("launch_tracker listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Keep the next-launch selection fresh
async fn start_background_tasks(config: &AppConfig, hero: Arc<HeroPanel<SpaceXClient>>) {
    let interval = config.next_launch_refresh_seconds.max(1);

    // Background task: reselect as soon as the tracked launch reaches T-0
    {
        let hero = hero.clone();
        let mut states = hero.subscribe().await;
        tokio::spawn(async move {
            while states.changed().await.is_ok() {
                let elapsed = *states.borrow_and_update() == CountdownState::Elapsed;
                if elapsed {
                    info!("Tracked launch reached T-0, selecting the next one");
                    hero.refresh().await;
                }
            }
        });
    }

    // Background task: periodic reselection
    tokio::spawn(async move {
        info!("Starting next launch refresh task (interval: {}s)", interval);
        loop {
            let next = hero.refresh().await;
            info!(
                "Hero panel now tracking '{}' at {}",
                next.record().name,
                next.record().date_utc
            );
            tokio::time::sleep(Duration::from_secs(interval)).await;
        }
    });

    info!("Background tasks started successfully");
}
