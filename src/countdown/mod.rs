/// Countdown timer engine driving the hero panel
use crate::domain::TimeRemaining;
use crate::utils::parse_instant;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Period between two recomputations of the remaining time
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CountdownState {
    /// No target supplied
    Idle,
    Counting { remaining: TimeRemaining },
    /// Target reached or unusable; terminal until retargeted
    Elapsed,
}

impl CountdownState {
    /// State for one tick
    pub fn at(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let delta = (target - now).num_milliseconds();
        if delta < 0 {
            CountdownState::Elapsed
        } else {
            CountdownState::Counting {
                remaining: TimeRemaining::from_millis(delta as u64),
            }
        }
    }
}

/// Owns the periodic tick for one target at a time.
///
/// The tick task is aborted on `stop`, on retarget and on drop, so a countdown
/// never leaves a ticking task behind.
pub struct Countdown {
    clock: Arc<dyn Clock>,
    target: Option<String>,
    state: Arc<watch::Sender<CountdownState>>,
    ticker: Option<JoinHandle<()>>,
}

impl Countdown {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let (state, _) = watch::channel(CountdownState::Idle);
        Self {
            clock,
            target: None,
            state: Arc::new(state),
            ticker: None,
        }
    }

    /// Create and mount on `target`. Must be called inside a tokio runtime.
    #[cfg(test)]
    pub fn start(clock: Arc<dyn Clock>, target: Option<&str>) -> Self {
        let mut countdown = Self::new(clock);
        countdown.set_target(target);
        countdown
    }

    /// Re-initialize on a new target; the same target again is a no-op
    pub fn set_target(&mut self, target: Option<&str>) {
        if self.target.as_deref() == target {
            return;
        }
        self.stop();
        self.target = target.map(str::to_owned);

        let Some(raw) = target else {
            self.state.send_replace(CountdownState::Idle);
            return;
        };

        let Some(instant) = parse_instant(raw) else {
            warn!("Countdown target '{}' is not a valid instant", raw);
            self.state.send_replace(CountdownState::Elapsed);
            return;
        };

        let now = self.clock.now();
        if instant <= now {
            debug!("Countdown target {} already passed", instant);
            self.state.send_replace(CountdownState::Elapsed);
            return;
        }

        self.state.send_replace(CountdownState::at(instant, now));
        self.ticker = Some(tokio::spawn(run_ticker(
            Arc::clone(&self.clock),
            instant,
            Arc::clone(&self.state),
        )));
        debug!("Countdown started for {}", instant);
    }

    /// Cancel the tick, keeping the last published state
    pub fn stop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
            debug!("Countdown tick released");
        }
    }

    pub fn state(&self) -> CountdownState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.state.subscribe()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_ticker(
    clock: Arc<dyn Clock>,
    target: DateTime<Utc>,
    state: Arc<watch::Sender<CountdownState>>,
) {
    let mut interval = tokio::time::interval(TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let next = CountdownState::at(target, clock.now());
        state.send_replace(next);
        if next == CountdownState::Elapsed {
            debug!("Countdown for {} elapsed", target);
            break;
        }
    }
}
