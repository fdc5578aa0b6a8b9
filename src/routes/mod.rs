/// Application routes configuration
use crate::handlers::{get_history, get_launches, get_next_launch, health, AppState};
use axum::{routing::get, Router};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Hero and history panels
        .route("/launches/next", get(get_next_launch))
        .route("/launches/history", get(get_history))
        // Raw categories
        .route("/launches/category/:category", get(get_launches))
        .with_state(state)
}
