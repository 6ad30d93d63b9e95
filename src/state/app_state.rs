//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::info;

use super::TimerState;
use crate::{
    error::ServiceError,
    tasks::{CountdownHandle, Input},
};

/// Application state shared by the HTTP handlers
#[derive(Debug)]
pub struct AppState {
    /// Handle to the countdown event loop
    pub countdown: CountdownHandle,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(port: u16, host: String, countdown: CountdownHandle) -> Self {
        Self {
            countdown,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Forward an input to the countdown and record it as the last action
    pub async fn apply(&self, input: Input) -> Result<TimerState, ServiceError> {
        let timer_state = self.countdown.send(input).await?;

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(input.name().to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        info!("Applied {} action, countdown is {}", input.name(), timer_state.run_state);
        Ok(timer_state)
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> TimerState {
        self.countdown.timer_state()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;
        
        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
