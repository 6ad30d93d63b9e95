//! Countdown event loop
//!
//! One task owns the [`CountdownController`]. User inputs from a
//! [`CountdownHandle`] and ticks from the tick sources share one channel, so
//! they are applied in the order they arrive and the controller never needs a
//! lock.

use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, info};

use crate::{
    countdown::{CountdownController, IntervalTickSourceFactory, Tick, TickSourceFactory, ViewSignal},
    error::ServiceError,
    state::TimerState,
};

/// User inputs accepted by the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    SelectDuration(u64),
    StartToggle,
    Cancel,
}

impl Input {
    pub fn name(&self) -> &'static str {
        match self {
            Input::SelectDuration(_) => "duration",
            Input::StartToggle => "toggle",
            Input::Cancel => "cancel",
        }
    }
}

/// Everything the event loop consumes
#[derive(Debug)]
pub enum CountdownEvent {
    /// A user input, answered with the state right after it is applied
    Input {
        input: Input,
        reply: oneshot::Sender<TimerState>,
    },
    Tick(Tick),
}

impl From<Tick> for CountdownEvent {
    fn from(tick: Tick) -> Self {
        CountdownEvent::Tick(tick)
    }
}

/// Cloneable entry point to a running countdown
#[derive(Debug, Clone)]
pub struct CountdownHandle {
    events: mpsc::UnboundedSender<CountdownEvent>,
    signals: broadcast::Sender<ViewSignal>,
    state: watch::Receiver<TimerState>,
}

impl CountdownHandle {
    /// Apply an input and return the state right after it
    pub async fn send(&self, input: Input) -> Result<TimerState, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.events
            .send(CountdownEvent::Input { input, reply })
            .map_err(|_| ServiceError::Closed)?;
        rx.await.map_err(|_| ServiceError::NoReply)
    }

    pub async fn select_duration(&self, seconds: u64) -> Result<TimerState, ServiceError> {
        self.send(Input::SelectDuration(seconds)).await
    }

    pub async fn start_toggle(&self) -> Result<TimerState, ServiceError> {
        self.send(Input::StartToggle).await
    }

    pub async fn cancel(&self) -> Result<TimerState, ServiceError> {
        self.send(Input::Cancel).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewSignal> {
        self.signals.subscribe()
    }

    /// Latest published state
    pub fn timer_state(&self) -> TimerState {
        self.state.borrow().clone()
    }
}

/// Spawn the countdown event loop with tokio interval tick sources
pub fn spawn_countdown(pending_duration: u64) -> (CountdownHandle, JoinHandle<()>) {
    spawn_countdown_with(IntervalTickSourceFactory::<CountdownEvent>::new, pending_duration)
}

/// Spawn the event loop with tick sources built by `make_factory`, which
/// receives the sender every source must report its ticks into
pub fn spawn_countdown_with<F, M>(make_factory: M, pending_duration: u64) -> (CountdownHandle, JoinHandle<()>)
where
    F: TickSourceFactory + 'static,
    F::Source: 'static,
    M: FnOnce(mpsc::UnboundedSender<CountdownEvent>) -> F,
{
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let controller = CountdownController::new(make_factory(events_tx.clone()), pending_duration);
    let handle = CountdownHandle {
        events: events_tx,
        signals: controller.signal_sender(),
        state: controller.watch_state(),
    };

    let task = tokio::spawn(countdown_task(controller, events_rx));
    (handle, task)
}

/// Event loop applying inputs and ticks to the controller
pub async fn countdown_task<F: TickSourceFactory>(
    mut controller: CountdownController<F>,
    mut events: mpsc::UnboundedReceiver<CountdownEvent>,
) {
    info!("Starting countdown task");

    while let Some(event) = events.recv().await {
        match event {
            CountdownEvent::Input { input, reply } => {
                debug!("Countdown input: {:?}", input);
                match input {
                    Input::SelectDuration(seconds) => controller.on_duration_selected(seconds),
                    Input::StartToggle => controller.on_start_toggle(),
                    Input::Cancel => controller.on_cancel(),
                }

                if reply.send(controller.snapshot()).is_err() {
                    debug!("Caller went away before the {} reply", input.name());
                }
            }
            CountdownEvent::Tick(tick) => controller.deliver(tick),
        }
    }

    info!("Countdown channel closed, stopping countdown task");
    controller.on_cancel();
}
