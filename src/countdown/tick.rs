//! Periodic tick sources driving the countdown

use std::time::Duration;

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, trace, warn};

use crate::error::TickSourceError;

/// Period between two countdown ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One firing of a tick source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Id of the source that produced this tick
    pub source: u64,
}

/// A repeating timer owned by the countdown controller.
///
/// A source is created idle, begins firing on [`TickSource::start`] with the
/// first tick delivered immediately, and can be suspended and resumed without
/// losing its schedule phase. Cancellation is final and is only accepted while
/// the source is not suspended.
pub trait TickSource: Send {
    fn id(&self) -> u64;
    fn start(&mut self);
    fn suspend(&mut self);
    fn resume(&mut self);
    fn cancel(&mut self) -> Result<(), TickSourceError>;
    fn is_suspended(&self) -> bool;
    /// Whether `tick` should reach the countdown right now
    fn accepts(&self, tick: &Tick) -> bool;
}

/// Creates a fresh [`TickSource`] for every countdown run
pub trait TickSourceFactory: Send {
    type Source: TickSource;

    fn create(&mut self, interval: Duration) -> Self::Source;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourcePhase {
    Idle,
    Running,
    Suspended,
    Cancelled,
}

/// Tick source backed by `tokio::time::interval`.
///
/// Ticks are sent as `E`, so they can share one channel with other events
/// and keep their arrival order.
#[derive(Debug)]
pub struct IntervalTickSource<E = Tick> {
    id: u64,
    interval: Duration,
    phase: SourcePhase,
    phase_tx: watch::Sender<SourcePhase>,
    ticks: mpsc::UnboundedSender<E>,
    task: Option<JoinHandle<()>>,
}

impl<E: From<Tick> + Send + 'static> IntervalTickSource<E> {
    fn new(id: u64, interval: Duration, ticks: mpsc::UnboundedSender<E>) -> Self {
        let (phase_tx, _) = watch::channel(SourcePhase::Idle);
        Self {
            id,
            interval,
            phase: SourcePhase::Idle,
            phase_tx,
            ticks,
            task: None,
        }
    }

    fn set_phase(&mut self, phase: SourcePhase) {
        self.phase = phase;
        self.phase_tx.send_replace(phase);
    }
}

impl<E: From<Tick> + Send + 'static> TickSource for IntervalTickSource<E> {
    fn id(&self) -> u64 {
        self.id
    }

    fn start(&mut self) {
        if self.phase != SourcePhase::Idle {
            warn!("Tick source {} already started", self.id);
            return;
        }
        self.set_phase(SourcePhase::Running);
        let phase_rx = self.phase_tx.subscribe();
        self.task = Some(tokio::spawn(run_interval(
            self.id,
            self.interval,
            phase_rx,
            self.ticks.clone(),
        )));
        debug!("Tick source {} started with {:?} period", self.id, self.interval);
    }

    fn suspend(&mut self) {
        if self.phase == SourcePhase::Running {
            self.set_phase(SourcePhase::Suspended);
            debug!("Tick source {} suspended", self.id);
        }
    }

    fn resume(&mut self) {
        if self.phase == SourcePhase::Suspended {
            self.set_phase(SourcePhase::Running);
            debug!("Tick source {} resumed", self.id);
        }
    }

    fn cancel(&mut self) -> Result<(), TickSourceError> {
        match self.phase {
            SourcePhase::Suspended => return Err(TickSourceError::Suspended(self.id)),
            SourcePhase::Cancelled => return Err(TickSourceError::Cancelled(self.id)),
            SourcePhase::Idle | SourcePhase::Running => {}
        }
        self.set_phase(SourcePhase::Cancelled);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        debug!("Tick source {} cancelled", self.id);
        Ok(())
    }

    fn is_suspended(&self) -> bool {
        self.phase == SourcePhase::Suspended
    }

    fn accepts(&self, tick: &Tick) -> bool {
        tick.source == self.id && self.phase == SourcePhase::Running
    }
}

impl<E> Drop for IntervalTickSource<E> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Keeps the interval running while suspended and drops those ticks, so the
/// schedule phase survives a pause and nothing is buffered for the resume.
async fn run_interval<E: From<Tick>>(
    id: u64,
    period: Duration,
    mut phase_rx: watch::Receiver<SourcePhase>,
    ticks: mpsc::UnboundedSender<E>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let phase = *phase_rx.borrow();
                match phase {
                    SourcePhase::Running => {
                        if ticks.send(Tick { source: id }.into()).is_err() {
                            debug!("Tick receiver closed, stopping source {}", id);
                            break;
                        }
                    }
                    SourcePhase::Suspended => trace!("Source {} suspended, tick dropped", id),
                    SourcePhase::Idle | SourcePhase::Cancelled => break,
                }
            }
            changed = phase_rx.changed() => {
                if changed.is_err() || *phase_rx.borrow() == SourcePhase::Cancelled {
                    break;
                }
            }
        }
    }
}

/// Hands out [`IntervalTickSource`]s that all report into one channel
#[derive(Debug)]
pub struct IntervalTickSourceFactory<E = Tick> {
    ticks: mpsc::UnboundedSender<E>,
    next_id: u64,
}

impl<E> IntervalTickSourceFactory<E> {
    pub fn new(ticks: mpsc::UnboundedSender<E>) -> Self {
        Self { ticks, next_id: 0 }
    }
}

impl<E: From<Tick> + Send + 'static> TickSourceFactory for IntervalTickSourceFactory<E> {
    type Source = IntervalTickSource<E>;

    fn create(&mut self, interval: Duration) -> IntervalTickSource<E> {
        self.next_id += 1;
        IntervalTickSource::new(self.next_id, interval, self.ticks.clone())
    }
}
