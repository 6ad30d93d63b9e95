//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};

use crate::{
    countdown::ViewSignal,
    state::{AppState, RunState},
    tasks::Input,
};
use super::responses::{ApiResponse, DurationRequest, HealthResponse, StatusResponse};

/// Handle POST /duration - Select the duration of the next run
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let seconds = request.total_seconds();
    match state.apply(Input::SelectDuration(seconds)).await {
        Ok(timer) => {
            let message = if !timer.is_active() {
                info!("Duration endpoint called - next run set to {}s", seconds);
                format!("Next countdown set to {}s", seconds)
            } else {
                warn!("Duration endpoint called during a run - selection ignored");
                "Duration can only be changed while the countdown is finished".to_string()
            };
            Ok(Json(ApiResponse::new(message, timer)))
        }
        Err(e) => {
            error!("Failed to select duration: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Handle POST /toggle - Start, pause or resume the countdown
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.apply(Input::StartToggle).await {
        Ok(timer) => {
            let message = match timer.run_state {
                RunState::Running => "Countdown running",
                RunState::Paused => "Countdown paused",
                RunState::Finished => "Countdown finished",
            };
            info!("Toggle endpoint called - {}", message);
            Ok(Json(ApiResponse::new(message.to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to toggle countdown: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Handle POST /cancel - Stop the current run without an alert
pub async fn cancel_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.apply(Input::Cancel).await {
        Ok(timer) => {
            info!("Cancel endpoint called - countdown finished");
            Ok(Json(ApiResponse::new("Countdown cancelled".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to cancel countdown: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Handle GET /status - Return current countdown status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = state.get_timer_state();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        display: timer.display().map(|time| time.to_string()),
        progress: timer.progress(),
        view: timer.view_mode.config(),
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /events - Stream view signals as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(signal_events(state.countdown.subscribe())).keep_alive(KeepAlive::default())
}

/// Turn view signals into SSE events named after the signal, skipping over
/// signals lost to a lagging receiver
pub fn signal_events(
    signals: broadcast::Receiver<ViewSignal>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(signals, |mut signals| async move {
        loop {
            match signals.recv().await {
                Ok(signal) => {
                    let event = Event::default()
                        .event(signal.name())
                        .json_data(&signal)
                        .unwrap_or_else(|e| {
                            error!("Failed to encode {} signal: {}", signal.name(), e);
                            Event::default().comment("unencodable signal")
                        });
                    return Some((Ok(event), signals));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} signals", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::countdown::ViewMode;

    #[tokio::test]
    async fn lagged_signals_are_skipped() {
        let (tx, rx) = broadcast::channel(2);
        for remaining in (0..5).rev() {
            tx.send(ViewSignal::display_update(remaining, 0.5)).unwrap();
        }
        drop(tx);

        // Only the two newest signals survive the lag
        assert_eq!(signal_events(rx).count().await, 2);
    }

    #[tokio::test]
    async fn stream_ends_when_signals_close() {
        let (tx, rx) = broadcast::channel(8);
        tx.send(ViewSignal::ViewConfig { mode: ViewMode::Active }).unwrap();
        tx.send(ViewSignal::CompletionAlert).unwrap();
        drop(tx);

        let events: Vec<_> = signal_events(rx).collect().await;
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|event| event.is_ok()));
    }
}
