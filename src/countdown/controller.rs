//! Countdown state machine
//!
//! The controller owns the run state and the tick source of the current run.
//! It is driven by three user inputs and by ticks, and reports everything the
//! screen needs through [`ViewSignal`]s plus a [`TimerState`] snapshot.

use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, trace};

use super::{
    display::{progress_fraction, DisplayTime},
    tick::{Tick, TickSource, TickSourceFactory, TICK_INTERVAL},
    view::{ViewMode, ViewSignal},
};
use crate::state::{RunState, TimerState};

/// Capacity of the view signal channel
pub const SIGNAL_CHANNEL_CAPACITY: usize = 256;

/// Half turns played by the rotation cue on every tick
const ROTATION_HALF_TURNS: u8 = 2;

pub struct CountdownController<F: TickSourceFactory> {
    factory: F,
    source: Option<F::Source>,
    run_state: RunState,
    pending_duration: u64,
    duration: u64,
    remaining: u64,
    signal_tx: broadcast::Sender<ViewSignal>,
    state_tx: watch::Sender<TimerState>,
}

impl<F: TickSourceFactory> CountdownController<F> {
    /// Create a finished controller that will run for `pending_duration`
    /// seconds unless another duration is selected first
    pub fn new(factory: F, pending_duration: u64) -> Self {
        let (signal_tx, _) = broadcast::channel(SIGNAL_CHANNEL_CAPACITY);
        let (state_tx, _) = watch::channel(TimerState::new(pending_duration));
        Self {
            factory,
            source: None,
            run_state: RunState::Finished,
            pending_duration,
            duration: 0,
            remaining: 0,
            signal_tx,
            state_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewSignal> {
        self.signal_tx.subscribe()
    }

    pub fn signal_sender(&self) -> broadcast::Sender<ViewSignal> {
        self.signal_tx.clone()
    }

    pub fn watch_state(&self) -> watch::Receiver<TimerState> {
        self.state_tx.subscribe()
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn pending_duration(&self) -> u64 {
        self.pending_duration
    }

    /// Length of the current run
    pub fn duration(&self) -> Option<u64> {
        self.run_state.in_run().then_some(self.duration)
    }

    /// Seconds left in the current run, or where the last run stopped
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining
    }

    pub fn progress(&self) -> Option<f32> {
        if self.run_state.in_run() {
            progress_fraction(self.remaining, self.duration)
        } else {
            None
        }
    }

    pub fn display_time(&self) -> DisplayTime {
        DisplayTime::from_seconds(self.remaining)
    }

    /// Id of the tick source owned by the current run
    pub fn active_source(&self) -> Option<u64> {
        self.source.as_ref().map(|source| source.id())
    }

    pub fn snapshot(&self) -> TimerState {
        let in_run = self.run_state.in_run();
        TimerState {
            run_state: self.run_state,
            duration_seconds: in_run.then_some(self.duration),
            pending_duration_seconds: self.pending_duration,
            remaining_seconds: in_run.then_some(self.remaining),
            view_mode: if in_run { ViewMode::Active } else { ViewMode::Initial },
        }
    }

    /// Store the duration for the next run. Ignored while a run is in progress.
    pub fn on_duration_selected(&mut self, seconds: u64) {
        if self.run_state != RunState::Finished {
            debug!("Ignoring duration selection of {}s while {}", seconds, self.run_state);
            return;
        }
        self.pending_duration = seconds;
        debug!("Pending duration set to {}s", seconds);
        self.publish_state();
    }

    pub fn on_start_toggle(&mut self) {
        match self.run_state {
            RunState::Finished => {
                self.duration = self.pending_duration;
                self.remaining = self.duration;

                let mut source = self.factory.create(TICK_INTERVAL);
                source.start();
                self.source = Some(source);
                self.run_state = RunState::Running;

                info!("Countdown started for {}s", self.duration);
                self.emit(ViewSignal::ViewConfig { mode: ViewMode::Active });
            }
            RunState::Running => {
                if let Some(source) = self.source.as_mut() {
                    source.suspend();
                }
                self.run_state = RunState::Paused;

                info!("Countdown paused with {}s remaining", self.remaining);
                self.emit(ViewSignal::ToggleSelected { selected: false });
            }
            RunState::Paused => {
                if let Some(source) = self.source.as_mut() {
                    source.resume();
                }
                self.run_state = RunState::Running;

                info!("Countdown resumed with {}s remaining", self.remaining);
                self.emit(ViewSignal::ToggleSelected { selected: true });
            }
        }
        self.publish_state();
    }

    pub fn on_cancel(&mut self) {
        if self.run_state == RunState::Finished {
            trace!("Cancel ignored, no run in progress");
            return;
        }
        info!("Countdown cancelled with {}s remaining", self.remaining);
        self.stop();
    }

    /// Route a tick to the countdown if the current source accepts it.
    ///
    /// Suppressing ticks while paused, or ticks from a cancelled or older
    /// source, is the job of [`TickSource::accepts`]. The tick handler itself
    /// has no run state guard.
    pub fn deliver(&mut self, tick: Tick) {
        match &self.source {
            Some(source) if source.accepts(&tick) => self.on_tick(),
            _ => trace!("Tick from source {} not delivered", tick.source),
        }
    }

    fn on_tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
        let progress = progress_fraction(self.remaining, self.duration).unwrap_or(0.0);
        debug!("Tick: {} remaining", DisplayTime::from_seconds(self.remaining));
        self.emit(ViewSignal::display_update(self.remaining, progress));

        if self.remaining == 0 {
            info!("Countdown finished after {}s", self.duration);
            self.stop();
            self.emit(ViewSignal::CompletionAlert);
        } else {
            self.publish_state();
        }

        self.emit(ViewSignal::RotationCue {
            half_turns: ROTATION_HALF_TURNS,
        });
    }

    /// Tear down the current run, shared by cancel and natural completion
    fn stop(&mut self) {
        if let Some(mut source) = self.source.take() {
            if source.is_suspended() {
                source.resume();
            }
            if let Err(e) = source.cancel() {
                error!("Failed to cancel tick source: {}", e);
            }
        }
        self.run_state = RunState::Finished;
        self.emit(ViewSignal::ViewConfig { mode: ViewMode::Initial });
        self.publish_state();
    }

    fn emit(&self, signal: ViewSignal) {
        if self.signal_tx.send(signal).is_err() {
            trace!("No view subscribers");
        }
    }

    fn publish_state(&self) {
        self.state_tx.send_replace(self.snapshot());
    }
}
