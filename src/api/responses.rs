//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{countdown::ViewConfig, state::TimerState};

/// Body of `POST /duration`, combined into one countdown length
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DurationRequest {
    #[serde(default)]
    pub hours: u64,
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

impl DurationRequest {
    pub fn total_seconds(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }
}

/// API response structure for countdown input endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
}

impl ApiResponse {
    /// Create a response whose status is the resulting run state
    pub fn new(message: String, timer: TimerState) -> Self {
        Self {
            status: timer.run_state.as_str().to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Status response with display values for the current run
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    /// Remaining time as `HH:MM:SS`
    pub display: Option<String>,
    pub progress: Option<f32>,
    pub view: ViewConfig,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
