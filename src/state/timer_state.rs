//! Snapshot of the countdown published to observers

use serde::{Deserialize, Serialize};

use super::RunState;
use crate::countdown::{progress_fraction, DisplayTime, ViewMode};

/// Point-in-time view of the countdown controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub run_state: RunState,
    /// Length of the current run, `None` while finished
    pub duration_seconds: Option<u64>,
    /// Duration the next run will use
    pub pending_duration_seconds: u64,
    pub remaining_seconds: Option<u64>,
    pub view_mode: ViewMode,
}

impl TimerState {
    /// Create a finished timer state with the given pending duration
    pub fn new(pending_duration_seconds: u64) -> Self {
        Self {
            run_state: RunState::Finished,
            duration_seconds: None,
            pending_duration_seconds,
            remaining_seconds: None,
            view_mode: ViewMode::Initial,
        }
    }

    /// Check if a run is in progress
    pub fn is_active(&self) -> bool {
        self.run_state.in_run()
    }

    /// Remaining time split into clock fields
    pub fn display(&self) -> Option<DisplayTime> {
        self.remaining_seconds.map(DisplayTime::from_seconds)
    }

    /// Fraction of the run still remaining
    pub fn progress(&self) -> Option<f32> {
        match (self.remaining_seconds, self.duration_seconds) {
            (Some(remaining), Some(duration)) => progress_fraction(remaining, duration),
            _ => None,
        }
    }
}
