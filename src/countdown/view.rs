//! Signals emitted to the presentation layer

use serde::{Deserialize, Serialize};

use super::display::DisplayTime;

/// Title shown on the toggle button while it is not selected
pub const START_TITLE: &str = "Start";
/// Title shown on the toggle button while it is selected
pub const PAUSE_TITLE: &str = "Pause";

/// Which of the two screen layouts should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Duration picker visible, countdown hidden
    Initial,
    /// Countdown label and progress bar visible
    Active,
}

impl ViewMode {
    pub fn config(self) -> ViewConfig {
        match self {
            ViewMode::Initial => ViewConfig {
                mode: self,
                time_label_visible: false,
                progress_visible: false,
                duration_picker_visible: true,
                cancel_enabled: false,
                toggle_selected: false,
                toggle_title: START_TITLE,
                reset_rotation: true,
            },
            ViewMode::Active => ViewConfig {
                mode: self,
                time_label_visible: true,
                progress_visible: true,
                duration_picker_visible: false,
                cancel_enabled: true,
                toggle_selected: true,
                toggle_title: PAUSE_TITLE,
                reset_rotation: false,
            },
        }
    }
}

/// Concrete widget state for a [`ViewMode`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewConfig {
    pub mode: ViewMode,
    pub time_label_visible: bool,
    pub progress_visible: bool,
    pub duration_picker_visible: bool,
    pub cancel_enabled: bool,
    pub toggle_selected: bool,
    pub toggle_title: &'static str,
    pub reset_rotation: bool,
}

/// Everything the controller tells the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewSignal {
    /// New remaining time and progress, once per tick
    DisplayUpdate {
        time: DisplayTime,
        progress: f32,
    },
    /// Switch between the initial and active layouts
    ViewConfig { mode: ViewMode },
    /// Toggle button selection changed by pause or resume
    ToggleSelected { selected: bool },
    /// Full turn of the timer image, played as two chained half turns
    RotationCue { half_turns: u8 },
    /// The countdown reached zero on its own
    CompletionAlert,
}

impl ViewSignal {
    pub fn display_update(remaining: u64, progress: f32) -> Self {
        ViewSignal::DisplayUpdate {
            time: DisplayTime::from_seconds(remaining),
            progress,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewSignal::DisplayUpdate { .. } => "display_update",
            ViewSignal::ViewConfig { .. } => "view_config",
            ViewSignal::ToggleSelected { .. } => "toggle_selected",
            ViewSignal::RotationCue { .. } => "rotation_cue",
            ViewSignal::CompletionAlert => "completion_alert",
        }
    }
}
