use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::timer::TimerSnapshot;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCompleted {
    pub duration_secs: u64,
    pub stopped_at: DateTime<Utc>,
}

/// State changes the screen re-renders on.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum AppEvent {
    TimerStateChanged(TimerSnapshot),
    HistoryChanged(Vec<u64>),
    SessionCompleted(SessionCompleted),
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Delivers `event` to current subscribers. Having none is not an error.
    pub fn emit(&self, event: AppEvent) {
        let _ = self.sender.send(event);
    }
}
