/// HTTP request handlers
use crate::clients::SpaceXClient;
use crate::countdown::CountdownState;
use crate::domain::{FilterCriterion, Health, LaunchCategory, LaunchRecord, MissionStatus, NextLaunch};
use crate::errors::ApiError;
use crate::services::{HeroPanel, HistoryStatus, LaunchProvider, MissionHistory};
use crate::utils::{launch_site_label, patch_or_default};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<LaunchProvider<SpaceXClient>>,
    pub hero: Arc<HeroPanel<SpaceXClient>>,
    pub history_display_cap: usize,
}

/// Successful response wrapper
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

/// Hero panel payload
#[derive(Serialize)]
pub struct NextLaunchView {
    #[serde(flatten)]
    pub next: NextLaunch,
    pub site: String,
    pub countdown: CountdownState,
}

/// One row of the history panel
#[derive(Serialize)]
pub struct MissionCard {
    #[serde(flatten)]
    pub launch: LaunchRecord,
    pub status: MissionStatus,
    pub status_label: &'static str,
    pub patch: String,
}

impl MissionCard {
    pub fn new(launch: &LaunchRecord, upcoming: bool) -> Self {
        let status = MissionStatus::of(launch, upcoming);
        Self {
            launch: launch.clone(),
            status,
            status_label: status.label(),
            patch: patch_or_default(launch).to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct HistoryView {
    pub status: HistoryStatus,
    pub filter: FilterCriterion,
    pub past: Vec<MissionCard>,
    pub upcoming: Vec<MissionCard>,
    /// Past launches matching the filter, before the display cap
    pub past_total: usize,
    /// Past launches of any outcome
    pub past_recorded: usize,
    pub upcoming_total: usize,
}

impl HistoryView {
    pub fn new(history: &MissionHistory) -> Self {
        Self {
            status: history.status(),
            filter: history.filter(),
            past: history
                .visible_past()
                .into_iter()
                .map(|launch| MissionCard::new(launch, false))
                .collect(),
            upcoming: history
                .visible_upcoming()
                .into_iter()
                .map(|launch| MissionCard::new(launch, true))
                .collect(),
            past_total: history.filtered_past().len(),
            past_recorded: history.past().len(),
            upcoming_total: history.upcoming().len(),
        }
    }
}

#[derive(Serialize)]
pub struct LaunchList {
    pub category: LaunchCategory,
    pub count: usize,
    pub launches: Vec<LaunchRecord>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub filter: Option<String>,
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// Next launch with its countdown
pub async fn get_next_launch(
    State(state): State<AppState>,
) -> Json<SuccessResponse<NextLaunchView>> {
    let (next, countdown) = state.hero.current().await;
    let site = launch_site_label(next.record()).to_string();
    Json(SuccessResponse::new(NextLaunchView {
        next,
        site,
        countdown,
    }))
}

/// Past and upcoming launches, past ones filtered by outcome
pub async fn get_history(
    Query(query): Query<HistoryQuery>,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<HistoryView>>, ApiError> {
    let filter = match query.filter.as_deref() {
        Some(raw) => raw.parse::<FilterCriterion>()?,
        None => FilterCriterion::All,
    };

    let mut history = MissionHistory::new(state.history_display_cap);
    history.activate(Arc::clone(&state.provider)).await;
    history.set_filter(filter);

    Ok(Json(SuccessResponse::new(HistoryView::new(&history))))
}

/// Normalized launches for one category
pub async fn get_launches(
    Path(category): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<LaunchList>>, ApiError> {
    let category = category.parse::<LaunchCategory>()?;
    let launches = state.provider.fetch_launches(category).await;
    Ok(Json(SuccessResponse::new(LaunchList {
        category,
        count: launches.len(),
        launches,
    })))
}
