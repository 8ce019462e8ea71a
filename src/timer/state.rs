use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    /// Never started, paused, reset or stopped.
    Idle,
    Running,
}

impl Default for TimerStatus {
    fn default() -> Self {
        TimerStatus::Idle
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub status: TimerStatus,
    pub elapsed_secs: u64,
    /// Bumped every time the timer starts running; ticks carrying an older
    /// value are ignored.
    #[serde(skip)]
    pub run_id: u64,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Flips between running and idle. Returns the new run id when the timer starts.
    pub fn toggle(&mut self) -> Option<u64> {
        match self.status {
            TimerStatus::Idle => {
                self.status = TimerStatus::Running;
                self.run_id = self.run_id.wrapping_add(1);
                Some(self.run_id)
            }
            TimerStatus::Running => {
                self.status = TimerStatus::Idle;
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.status = TimerStatus::Idle;
        self.elapsed_secs = 0;
    }

    /// Adds one second if `run_id` is the current run and the timer is running.
    pub fn tick(&mut self, run_id: u64) -> bool {
        if self.is_running() && self.run_id == run_id {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
            true
        } else {
            false
        }
    }

    /// Ends the session if any time has elapsed, returning its duration.
    /// At zero nothing changes.
    pub fn take_completed(&mut self) -> Option<u64> {
        if self.elapsed_secs == 0 {
            return None;
        }
        let duration = self.elapsed_secs;
        self.reset();
        Some(duration)
    }
}
