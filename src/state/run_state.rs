//! Lifecycle state of the countdown

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the countdown is in its start/pause/cancel cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// No run in progress, a new duration may be selected
    #[default]
    Finished,
    Running,
    Paused,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Finished => "finished",
            RunState::Running => "running",
            RunState::Paused => "paused",
        }
    }

    /// Whether a run is in progress, paused or not
    pub fn in_run(&self) -> bool {
        !matches!(self, RunState::Finished)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
