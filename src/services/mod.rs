/// Business logic services layer
use crate::clients::LaunchSource;
use crate::countdown::{Clock, Countdown, CountdownState};
use crate::domain::{FilterCriterion, LaunchCategory, LaunchRecord, NextLaunch};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, error, info, warn};

/// Default safety margin for the next-launch selection
pub const DEFAULT_MARGIN_HOURS: i64 = 24;

/// Entries shown per history list
pub const DEFAULT_DISPLAY_CAP: usize = 15;

const FALLBACK_NAME: &str = "Starship Flight 7 (Estimated)";
const FALLBACK_DATE: &str = "2030-06-20T18:00:00Z";
const FALLBACK_SITE: &str = "VCSC Starbase, TX";

/// Launch data provider; failures come back as an empty list
pub struct LaunchProvider<S> {
    source: S,
}

impl<S: LaunchSource> LaunchProvider<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch launches of one category, never failing
    pub async fn fetch_launches(&self, category: LaunchCategory) -> Vec<LaunchRecord> {
        match self.source.launches(category).await {
            Ok(records) => records,
            Err(e) => {
                error!("Launch fetch for '{}' failed: {}", category, e);
                Vec::new()
            }
        }
    }
}

/// Placeholder used when no real launch qualifies
pub fn fallback_launch() -> LaunchRecord {
    LaunchRecord {
        id: String::new(),
        name: FALLBACK_NAME.to_string(),
        flight_number: None,
        date_utc: FALLBACK_DATE.to_string(),
        success: None,
        launchpad: FALLBACK_SITE.to_string(),
        patch_image_url: None,
    }
}

/// First launch strictly later than `now + margin`, in feed order
pub fn select_next_launch(
    launches: &[LaunchRecord],
    now: DateTime<Utc>,
    margin: Duration,
) -> NextLaunch {
    let Some(threshold) = now.checked_add_signed(margin) else {
        warn!("Margin of {}h overflows the calendar, using placeholder", margin.num_hours());
        return NextLaunch::Synthetic(fallback_launch());
    };
    launches
        .iter()
        .find(|launch| launch.launch_time().is_some_and(|t| t > threshold))
        .cloned()
        .map(NextLaunch::Real)
        .unwrap_or_else(|| NextLaunch::Synthetic(fallback_launch()))
}

/// Keep the records matching `criterion`, preserving order
pub fn apply_filter(records: &[LaunchRecord], criterion: FilterCriterion) -> Vec<&LaunchRecord> {
    records.iter().filter(|r| criterion.matches(r)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryStatus {
    Loading,
    Ready,
}

/// Past and upcoming launches for the history panel
#[derive(Debug, Clone)]
pub struct MissionHistory {
    status: HistoryStatus,
    past: Vec<LaunchRecord>,
    upcoming: Vec<LaunchRecord>,
    filter: FilterCriterion,
    display_cap: usize,
}

impl MissionHistory {
    pub fn new(display_cap: usize) -> Self {
        Self {
            status: HistoryStatus::Loading,
            past: Vec::new(),
            upcoming: Vec::new(),
            filter: FilterCriterion::All,
            display_cap,
        }
    }

    /// Fetch past and upcoming launches concurrently and wait for both.
    ///
    /// Past launches arrive oldest first and are stored most recent first.
    /// A fetch that dies (panic or cancellation) is logged and leaves its
    /// list empty; the other list is kept and the history becomes ready.
    pub async fn activate<S>(&mut self, provider: Arc<LaunchProvider<S>>)
    where
        S: LaunchSource + 'static,
    {
        self.status = HistoryStatus::Loading;

        let past_task = {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move { provider.fetch_launches(LaunchCategory::Past).await })
        };
        let upcoming_task = {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move { provider.fetch_launches(LaunchCategory::Upcoming).await })
        };

        let (past, upcoming) = tokio::join!(past_task, upcoming_task);

        match past {
            Ok(mut records) => {
                records.reverse();
                self.past = records;
            }
            Err(e) => error!("Past launches task failed: {}", e),
        }
        match upcoming {
            Ok(records) => self.upcoming = records,
            Err(e) => error!("Upcoming launches task failed: {}", e),
        }

        self.status = HistoryStatus::Ready;
        info!(
            "Mission history ready: {} past, {} upcoming",
            self.past.len(),
            self.upcoming.len()
        );
    }

    pub fn status(&self) -> HistoryStatus {
        self.status
    }

    pub fn filter(&self) -> FilterCriterion {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterCriterion) {
        self.filter = filter;
    }

    pub fn past(&self) -> &[LaunchRecord] {
        &self.past
    }

    pub fn upcoming(&self) -> &[LaunchRecord] {
        &self.upcoming
    }

    /// Every past launch matching the current filter
    pub fn filtered_past(&self) -> Vec<&LaunchRecord> {
        apply_filter(&self.past, self.filter)
    }

    /// Filtered past launches, capped for display
    pub fn visible_past(&self) -> Vec<&LaunchRecord> {
        let mut visible = self.filtered_past();
        visible.truncate(self.display_cap);
        visible
    }

    pub fn visible_upcoming(&self) -> Vec<&LaunchRecord> {
        self.upcoming.iter().take(self.display_cap).collect()
    }
}

/// Hero panel: the selected next launch and its countdown
pub struct HeroPanel<S> {
    provider: Arc<LaunchProvider<S>>,
    clock: Arc<dyn Clock>,
    margin: Duration,
    next: RwLock<Option<NextLaunch>>,
    countdown: Mutex<Countdown>,
}

impl<S: LaunchSource> HeroPanel<S> {
    pub fn new(provider: Arc<LaunchProvider<S>>, clock: Arc<dyn Clock>, margin: Duration) -> Self {
        let countdown = Countdown::new(Arc::clone(&clock));
        Self {
            provider,
            clock,
            margin,
            next: RwLock::new(None),
            countdown: Mutex::new(countdown),
        }
    }

    /// Re-run the selection and point the countdown at the result
    pub async fn refresh(&self) -> NextLaunch {
        let launches = self.provider.fetch_launches(LaunchCategory::All).await;
        let next = select_next_launch(&launches, self.clock.now(), self.margin);

        if next.is_synthetic() {
            warn!(
                "No launch beyond the {}h margin among {} launches, using placeholder",
                self.margin.num_hours(),
                launches.len()
            );
        } else {
            info!("Next launch selected: {}", next.record().name);
        }

        {
            let mut countdown = self.countdown.lock().await;
            countdown.set_target(Some(next.record().date_utc.as_str()));
            debug!(
                countdown_target = ?countdown.target(),
                ticking = countdown.is_ticking(),
                "Hero countdown updated"
            );
        }
        *self.next.write().await = Some(next.clone());
        next
    }

    /// Observe countdown states across refreshes
    pub async fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.countdown.lock().await.subscribe()
    }

    /// Current selection, selecting first if nothing was selected yet
    pub async fn current(&self) -> (NextLaunch, CountdownState) {
        let existing = self.next.read().await.clone();
        let next = match existing {
            Some(next) => next,
            None => self.refresh().await,
        };
        let state = self.countdown.lock().await.state();
        (next, state)
    }
}
