use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::{
    events::{AppEvent, EventBus, SessionCompleted},
    format::format_elapsed,
    history::HistoryList,
    log_info,
};

use super::{TimerState, TimerStatus};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub display: String,
}

impl From<TimerState> for TimerSnapshot {
    fn from(state: TimerState) -> Self {
        Self {
            display: format_elapsed(state.elapsed_secs),
            state,
        }
    }
}

#[derive(Clone)]
pub struct TimerController {
    state: Arc<Mutex<TimerState>>,
    history: HistoryList,
    events: EventBus,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
}

impl TimerController {
    pub fn new(history: HistoryList, events: EventBus, tick_interval: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(TimerState::new())),
            history,
            events,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
        }
    }

    pub async fn get_state(&self) -> TimerState {
        self.state.lock().await.clone()
    }

    pub async fn get_snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from(self.get_state().await)
    }

    /// Start/Pause control. Starting arms a fresh ticker; pausing retires it.
    pub async fn toggle(&self) -> TimerState {
        let started = self.state.lock().await.toggle();

        match started {
            Some(run_id) => self.spawn_ticker(run_id).await,
            None => self.cancel_ticker().await,
        }

        self.emit_state_changed().await
    }

    pub async fn reset(&self) -> TimerState {
        self.state.lock().await.reset();
        self.cancel_ticker().await;
        self.emit_state_changed().await
    }

    /// Ends the current session and records it. Returns `None`, touching
    /// nothing, when no time has elapsed.
    pub async fn stop(&self) -> Result<Option<u64>> {
        let completed = self.state.lock().await.take_completed();
        let Some(duration_secs) = completed else {
            return Ok(None);
        };

        self.cancel_ticker().await;
        self.emit_state_changed().await;

        self.history.record(duration_secs).await?;

        log_info!("Session completed after {}", format_elapsed(duration_secs));

        self.events.emit(AppEvent::SessionCompleted(SessionCompleted {
            duration_secs,
            stopped_at: Utc::now(),
        }));

        Ok(Some(duration_secs))
    }

    async fn spawn_ticker(&self, run_id: u64) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let events = self.events.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let first_tick = time::Instant::now() + tick_interval;
            let mut interval = time::interval_at(first_tick, tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;

                let snapshot = {
                    let mut guard = state.lock().await;
                    if !guard.tick(run_id) {
                        break;
                    }
                    guard.clone()
                };

                events.emit(AppEvent::TimerStateChanged(TimerSnapshot::from(snapshot)));
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn emit_state_changed(&self) -> TimerState {
        let state = self.get_state().await;
        self.events
            .emit(AppEvent::TimerStateChanged(TimerSnapshot::from(state.clone())));
        state
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.status == TimerStatus::Running
    }
}
